//! Row-wise execution of per-pixel filter passes.
//!
//! Every output pixel depends only on the immutable source, so rows can be
//! processed in any order. With the `rayon` feature, `Execution::Parallel`
//! distributes rows over the global thread pool; each worker owns its own
//! scratch buffers.

use crate::image::{PixelBuffer, PixelView};
use crate::util::PixFilterResult;

/// How the outer pixel loop of a filter pass is scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    /// Single-threaded row-major scan.
    #[default]
    Sequential,
    /// Row-parallel scan (requires the `rayon` feature, otherwise sequential).
    Parallel,
}

/// Per-worker scratch storage reused across pixels.
#[derive(Default)]
pub(crate) struct Scratch {
    pub(crate) window: Vec<u8>,
    pub(crate) values: Vec<u8>,
}

/// Produces a new buffer shaped like `src` by calling `per_pixel` for every
/// output pixel with its coordinates, scratch space and output slot.
pub(crate) fn map_pixels<F>(
    src: PixelView<'_>,
    exec: Execution,
    per_pixel: F,
) -> PixFilterResult<PixelBuffer>
where
    F: Fn(usize, usize, &mut Scratch, &mut [u8]) -> PixFilterResult<()> + Sync,
{
    let channels = src.channels();
    let row_len = src.row_len();
    let mut out = PixelBuffer::zeroed(src.width(), src.height(), channels)?;

    let run_row = |y: usize, row: &mut [u8], scratch: &mut Scratch| -> PixFilterResult<()> {
        for (x, px) in row.chunks_exact_mut(channels).enumerate() {
            per_pixel(x, y, scratch, px)?;
        }
        Ok(())
    };

    match exec {
        Execution::Sequential => run_rows_seq(out.data_mut(), row_len, &run_row)?,
        Execution::Parallel => run_rows_par(out.data_mut(), row_len, &run_row)?,
    }
    Ok(out)
}

fn run_rows_seq<R>(out: &mut [u8], row_len: usize, run_row: &R) -> PixFilterResult<()>
where
    R: Fn(usize, &mut [u8], &mut Scratch) -> PixFilterResult<()>,
{
    let mut scratch = Scratch::default();
    for (y, row) in out.chunks_exact_mut(row_len).enumerate() {
        run_row(y, row, &mut scratch)?;
    }
    Ok(())
}

#[cfg(feature = "rayon")]
fn run_rows_par<R>(out: &mut [u8], row_len: usize, run_row: &R) -> PixFilterResult<()>
where
    R: Fn(usize, &mut [u8], &mut Scratch) -> PixFilterResult<()> + Sync,
{
    use rayon::prelude::*;

    out.par_chunks_exact_mut(row_len)
        .enumerate()
        .try_for_each_init(Scratch::default, |scratch, (y, row)| {
            run_row(y, row, scratch)
        })
}

#[cfg(not(feature = "rayon"))]
fn run_rows_par<R>(out: &mut [u8], row_len: usize, run_row: &R) -> PixFilterResult<()>
where
    R: Fn(usize, &mut [u8], &mut Scratch) -> PixFilterResult<()> + Sync,
{
    run_rows_seq(out, row_len, run_row)
}
