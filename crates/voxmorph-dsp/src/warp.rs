//! Piecewise-linear frequency warping of spectral envelopes.

/// Control node mapping a source bin onto a destination bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpingPoint {
    pub src_bin: f32,
    pub dst_bin: f32,
}

/// Segments narrower than this collapse onto their left node.
const SEGMENT_EPS: f32 = 1e-4;

/// Builds a per-output-bin map of fractional input bins from a list of
/// warping nodes, and resamples envelopes through it.
///
/// The ends are always anchored: a `{0, 0}` node is prepended and a
/// `{num_bins - 1, num_bins - 1}` node appended when the caller's list
/// does not cover them, so any node list (including an empty one) yields
/// a total map.
pub struct FormantWarper {
    nodes: Vec<WarpingPoint>,
    warp_map: Vec<f32>,
}

impl FormantWarper {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            warp_map: Vec::new(),
        }
    }

    /// Preallocate for `num_bins` and up to `max_nodes` caller nodes, so
    /// later calls on the audio thread never allocate.
    pub fn with_capacity(num_bins: usize, max_nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(max_nodes + 2),
            warp_map: Vec::with_capacity(num_bins),
        }
    }

    /// Rebuild the warp map for `num_bins` output bins.
    pub fn calculate_warp_map(&mut self, num_bins: usize, points: &[WarpingPoint]) {
        debug_assert!(num_bins > 1);
        let last_bin = (num_bins - 1) as f32;

        self.nodes.clear();
        self.nodes.extend_from_slice(points);
        if self.nodes.first().map_or(true, |p| p.dst_bin > SEGMENT_EPS) {
            self.nodes.insert(
                0,
                WarpingPoint {
                    src_bin: 0.0,
                    dst_bin: 0.0,
                },
            );
        }
        if self.nodes.last().map_or(true, |p| p.dst_bin < last_bin) {
            self.nodes.push(WarpingPoint {
                src_bin: last_bin,
                dst_bin: last_bin,
            });
        }

        // Stable insertion sort by destination, in place. The node count is
        // small and the audio thread must not allocate.
        for i in 1..self.nodes.len() {
            let mut j = i;
            while j > 0 && self.nodes[j - 1].dst_bin > self.nodes[j].dst_bin {
                self.nodes.swap(j - 1, j);
                j -= 1;
            }
        }

        self.warp_map.clear();
        self.warp_map.resize(num_bins, 0.0);

        let mut seg = 0;
        for i in 0..num_bins {
            let x = i as f32;
            while seg + 2 < self.nodes.len() && self.nodes[seg + 1].dst_bin < x {
                seg += 1;
            }
            let p0 = self.nodes[seg];
            let p1 = self.nodes[seg + 1];
            let width = p1.dst_bin - p0.dst_bin;
            let src = if width < SEGMENT_EPS {
                p0.src_bin
            } else {
                p0.src_bin + (x - p0.dst_bin) / width * (p1.src_bin - p0.src_bin)
            };
            self.warp_map[i] = src.clamp(0.0, last_bin);
        }
    }

    /// Resample `src_env` through the warp map into `dst_env` with linear
    /// interpolation between input bins.
    pub fn process(&self, src_env: &[f32], dst_env: &mut [f32]) {
        debug_assert_eq!(src_env.len(), dst_env.len());
        debug_assert_eq!(self.warp_map.len(), src_env.len());

        let last = src_env.len() - 1;
        for (dst, &idx) in dst_env.iter_mut().zip(self.warp_map.iter()) {
            let i0 = idx as usize;
            let i1 = (i0 + 1).min(last);
            let frac = idx - i0 as f32;
            *dst = src_env[i0] + frac * (src_env[i1] - src_env[i0]);
        }
    }

    pub fn warp_map(&self) -> &[f32] {
        &self.warp_map
    }
}

impl Default for FormantWarper {
    fn default() -> Self {
        Self::new()
    }
}
