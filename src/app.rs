use crate::enums::{Axis, MemoryOrder, Plane};
use crate::surface::{self, SurfaceMesh};
use crate::volume::Volume;
use crate::volume_loader::{RawFilename, VolumeWriter};

use eframe::egui;
use log::{info, warn};
use nalgebra::Point3;
use std::path::PathBuf;
use thiserror::Error;

/// Entries at or below this magnitude (in degrees) are treated as zero
/// and the rotation is skipped.
pub const ZERO_ANGLE: f32 = 0.0001;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("no volume is loaded")]
    NotLoaded,
}

/// Apply the queued per-axis rotations in X, Y, Z order, skipping angles
/// inside the dead-zone.
pub fn apply_rotations(volume: &mut Volume, angles_deg: [f32; 3]) {
    for (axis, angle) in [Axis::X, Axis::Y, Axis::Z].into_iter().zip(angles_deg) {
        if angle.abs() > ZERO_ANGLE {
            volume.rotate(axis, angle);
        }
    }
}

fn parse_angle(entry: &str) -> Result<f32, String> {
    let trimmed = entry.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed.parse().map_err(|_| entry.to_owned())
}

/// The control surface binding entry fields and buttons to a loaded
/// volume. Everything runs synchronously on the UI thread; a rotation or
/// surface extraction blocks the frame it runs in.
pub struct TransformApp {
    volume: Option<Volume>,
    header: RawFilename,
    order: MemoryOrder,
    out_dir: PathBuf,
    rot_x: String,
    rot_y: String,
    rot_z: String,
    show_surface: bool,
    save_npz: bool,
    centered: bool,
    projections: Vec<(&'static str, egui::TextureHandle)>,
    surface: Option<SurfaceMesh>,
    status: String,
}

impl TransformApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        volume: Volume,
        header: RawFilename,
        order: MemoryOrder,
        out_dir: PathBuf,
    ) -> Self {
        let status = format!("loaded {}", header.file_name());
        let mut app = Self {
            volume: Some(volume),
            header,
            order,
            out_dir,
            rot_x: String::new(),
            rot_y: String::new(),
            rot_z: String::new(),
            show_surface: true,
            save_npz: false,
            centered: false,
            projections: Vec::new(),
            surface: None,
            status,
        };
        app.update_views(&cc.egui_ctx);
        app
    }

    fn refresh_views(&mut self, ctx: &egui::Context) -> Result<(), StateError> {
        let volume = self.volume.as_ref().ok_or(StateError::NotLoaded)?;

        self.projections.clear();
        for (plane, title) in [
            (Plane::XY, "XY-plane"),
            (Plane::XZ, "XZ-plane"),
            (Plane::YZ, "YZ-plane"),
        ] {
            let projection = volume.project(plane);
            let Some(image) = Volume::projection_to_image(&projection) else {
                continue;
            };
            let size = [image.width() as usize, image.height() as usize];
            let color = egui::ColorImage::from_gray(size, image.as_raw());
            self.projections
                .push((title, ctx.load_texture(title, color, egui::TextureOptions::NEAREST)));
        }

        if self.show_surface {
            self.surface = Some(surface::extract_surface(volume));
        }
        Ok(())
    }

    fn update_views(&mut self, ctx: &egui::Context) {
        if let Err(err) = self.refresh_views(ctx) {
            self.status = err.to_string();
        }
    }

    /// The Update action: lazy one-time centering, queued rotations,
    /// redraw.
    fn apply_update(&mut self, ctx: &egui::Context) {
        let angles = match [&self.rot_x, &self.rot_y, &self.rot_z]
            .map(|entry| parse_angle(entry))
        {
            [Ok(x), Ok(y), Ok(z)] => [x, y, z],
            parsed => {
                let bad = parsed.iter().filter_map(|r| r.as_ref().err()).next();
                self.status = format!("not a number: {}", bad.map(String::as_str).unwrap_or(""));
                return;
            }
        };

        let Some(volume) = self.volume.as_mut() else {
            self.status = StateError::NotLoaded.to_string();
            return;
        };
        if !self.centered {
            volume.center();
            self.centered = true;
        }
        apply_rotations(volume, angles);
        info!(
            "applied rotations {:?} deg, volume is {:?}",
            angles,
            volume.dim()
        );
        self.update_views(ctx);
        self.status = "updated".to_owned();
    }

    fn apply_exact(&mut self, ctx: &egui::Context, op: impl FnOnce(&mut Volume)) {
        let Some(volume) = self.volume.as_mut() else {
            self.status = StateError::NotLoaded.to_string();
            return;
        };
        op(volume);
        self.update_views(ctx);
        self.status = "updated".to_owned();
    }

    /// The Save action: raw file under the transform-marked name, plus the
    /// npz container when requested.
    fn save(&mut self) {
        let Some(volume) = self.volume.as_ref() else {
            self.status = StateError::NotLoaded.to_string();
            return;
        };
        match VolumeWriter::write_raw(volume, &self.header, &self.out_dir, self.order) {
            Ok(path) => {
                info!("saved {}", path.display());
                self.status = format!("saved {}", path.display());
            }
            Err(err) => {
                warn!("save failed: {err}");
                self.status = format!("save failed: {err}");
                return;
            }
        }
        if self.save_npz {
            match VolumeWriter::write_npz(volume, &self.header, &self.out_dir) {
                Ok(path) => info!("saved {}", path.display()),
                Err(err) => {
                    warn!("npz save failed: {err}");
                    self.status = format!("npz save failed: {err}");
                }
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.heading("Rotation (deg)");
        egui::Grid::new("angles").num_columns(2).show(ui, |ui| {
            ui.label("RotX");
            ui.text_edit_singleline(&mut self.rot_x);
            ui.end_row();
            ui.label("RotY");
            ui.text_edit_singleline(&mut self.rot_y);
            ui.end_row();
            ui.label("RotZ");
            ui.text_edit_singleline(&mut self.rot_z);
            ui.end_row();
        });

        ui.separator();
        ui.label("Quarter turns");
        ui.horizontal(|ui| {
            for axis in [Axis::X, Axis::Y, Axis::Z] {
                if ui.button(format!("{axis:?} 90°")).clicked() {
                    self.apply_exact(ctx, |v| v.rotate90(axis));
                }
            }
        });
        ui.label("Flips");
        ui.horizontal(|ui| {
            for axis in [Axis::X, Axis::Y, Axis::Z] {
                if ui.button(format!("Flip {axis:?}")).clicked() {
                    self.apply_exact(ctx, |v| v.flip(axis));
                }
            }
        });

        ui.separator();
        ui.checkbox(&mut self.show_surface, "Recompute isosurface");
        ui.checkbox(&mut self.save_npz, "Also save npz");

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Update").clicked() {
                self.apply_update(ctx);
            }
            if ui.button("Save").clicked() {
                self.save();
            }
        });

        ui.separator();
        ui.label(&self.status);
    }

    fn previews(&self, ui: &mut egui::Ui) {
        let spacing = ui.spacing().item_spacing.x;
        let side = ((ui.available_width() - spacing) / 2.0).max(64.0);
        egui::Grid::new("previews").num_columns(2).show(ui, |ui| {
            for row in self.projections.chunks(2) {
                for (title, texture) in row {
                    ui.vertical(|ui| {
                        ui.label(*title);
                        ui.add(
                            egui::Image::new(texture)
                                .fit_to_exact_size(egui::Vec2::splat(side)),
                        );
                    });
                }
                if row.len() == 1 {
                    // the fourth cell holds the isosurface
                    ui.vertical(|ui| {
                        ui.label("Isosurface");
                        match &self.surface {
                            Some(mesh) => draw_surface(ui, mesh, side),
                            None => {
                                ui.label("disabled");
                            }
                        }
                    });
                }
                ui.end_row();
            }
        });
    }
}

impl eframe::App for TransformApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("controls")
            .resizable(false)
            .show(ctx, |ui| self.controls(ui, ctx));
        egui::CentralPanel::default().show(ctx, |ui| self.previews(ui));
    }
}

/// Orthographic wireframe of the mesh under a fixed oblique view, fitted
/// to a square cell.
fn draw_surface(ui: &mut egui::Ui, mesh: &SurfaceMesh, side: f32) {
    let (response, painter) = ui.allocate_painter(egui::Vec2::splat(side), egui::Sense::hover());
    let rect = response.rect;
    if mesh.is_empty() {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "no surface at threshold",
            egui::FontId::default(),
            ui.visuals().weak_text_color(),
        );
        return;
    }

    let (sin_yaw, cos_yaw) = 0.7f32.sin_cos();
    let (sin_pitch, cos_pitch) = 0.45f32.sin_cos();
    let project = |p: &Point3<f32>| {
        let x = cos_yaw * p.x + sin_yaw * p.y;
        let y = cos_yaw * p.y - sin_yaw * p.x;
        // screen y grows downward
        egui::vec2(x, sin_pitch * y - cos_pitch * p.z)
    };

    let projected: Vec<egui::Vec2> = mesh.positions.iter().map(project).collect();
    let mut min = egui::Vec2::splat(f32::INFINITY);
    let mut max = egui::Vec2::splat(f32::NEG_INFINITY);
    for v in &projected {
        min = min.min(*v);
        max = max.max(*v);
    }
    let span = (max - min).max_elem().max(1e-6);
    let scale = side * 0.9 / span;
    let mid = (min + max) / 2.0;
    let to_screen = |v: egui::Vec2| rect.center() + (v - mid) * scale;

    let stroke = egui::Stroke::new(1.0, ui.visuals().weak_text_color());
    // painter cost caps the wireframe density
    let stride = (mesh.triangle_count() / 4000).max(1);
    for tri in mesh.indices.chunks_exact(3).step_by(stride) {
        let a = to_screen(projected[tri[0] as usize]);
        let b = to_screen(projected[tri[1] as usize]);
        let c = to_screen(projected[tri[2] as usize]);
        painter.line_segment([a, b], stroke);
        painter.line_segment([b, c], stroke);
        painter.line_segment([c, a], stroke);
    }
}
