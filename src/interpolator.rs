use ndarray::Array3;

pub(crate) struct Interpolator;

impl Interpolator {
    /// Bilinear sample in the (`p`, `q`) plane of `data`; the remaining
    /// index is taken from `idx` unchanged. Returns `None` when the sample
    /// point falls outside the plane bounds.
    #[inline]
    pub(crate) fn bilinear_sample(
        data: &Array3<u8>,
        idx: [usize; 3],
        p: usize,
        q: usize,
        pf: f32,
        qf: f32,
    ) -> Option<f32> {
        let np = data.shape()[p];
        let nq = data.shape()[q];
        if pf < 0.0 || qf < 0.0 || pf > (np - 1) as f32 || qf > (nq - 1) as f32 {
            return None;
        }

        let p0 = pf.floor() as usize;
        let q0 = qf.floor() as usize;
        let p1 = (p0 + 1).min(np - 1);
        let q1 = (q0 + 1).min(nq - 1);

        let dp = pf - p0 as f32;
        let dq = qf - q0 as f32;
        let one_minus_dp = 1.0 - dp;
        let one_minus_dq = 1.0 - dq;

        let at = |pi: usize, qi: usize| {
            let mut i = idx;
            i[p] = pi;
            i[q] = qi;
            data[i] as f32
        };

        let v00 = at(p0, q0);
        let v01 = at(p0, q1);
        let v10 = at(p1, q0);
        let v11 = at(p1, q1);

        let v0 = v00.mul_add(one_minus_dq, v01 * dq);
        let v1 = v10.mul_add(one_minus_dq, v11 * dq);

        Some(v0.mul_add(one_minus_dp, v1 * dp))
    }
}
