use crate::{
    cursor::Cursorer,
    error::PaginationError,
    obs::sink::{self, MetricsEvent},
    paginate::{Page, PageInfo, PageRequest, boundary_cursors, validate},
};

/// Page through rows that are already fully loaded in canonical order.
///
/// Cursors are matched by re-packing each row: rows up to and including the
/// `after` row are skipped, rows from the `before` row onward are cut. A
/// cursor that matches no row leaves that side unbounded. `total` is the
/// length of `all` and, as with keyset pages, is only reported when neither
/// cursor was supplied.
pub fn paginate_loaded<T, S, C>(
    all: Vec<T>,
    cursor: C,
    request: &PageRequest,
) -> Result<Page<T>, PaginationError>
where
    S: Cursorer,
    C: Fn(&T) -> Result<S, PaginationError>,
{
    let window = validate(request, None)?;
    let total = request.is_unbounded().then_some(all.len() as u64);

    let mut rows = all;
    if let Some(after) = request.after_cursor()
        && let Some(index) = position_of(&rows, &cursor, after)?
    {
        rows.drain(..=index);
    }
    if let Some(before) = request.before_cursor()
        && let Some(index) = position_of(&rows, &cursor, before)?
    {
        rows.truncate(index);
    }

    let size = usize::try_from(window.size).unwrap_or(usize::MAX);
    let has_more = rows.len() > size;
    if has_more {
        if window.forward {
            rows.truncate(size);
        } else {
            rows.drain(..rows.len() - size);
        }
    }

    let (start_cursor, end_cursor) = boundary_cursors(&rows, &cursor)?;

    sink::record(MetricsEvent::PageServed {
        shape: S::SHAPE,
        forward: window.forward,
        rows: rows.len() as u64,
    });

    let info = PageInfo {
        total,
        size: rows.len(),
        has_previous_page: has_more && !window.forward,
        has_next_page: has_more && window.forward,
        start_cursor,
        end_cursor,
    };

    Ok(Page::new(rows, info))
}

// Index of the first row whose packed cursor equals `token`.
fn position_of<T, S, C>(
    rows: &[T],
    cursor: &C,
    token: &str,
) -> Result<Option<usize>, PaginationError>
where
    S: Cursorer,
    C: Fn(&T) -> Result<S, PaginationError>,
{
    for (index, row) in rows.iter().enumerate() {
        if cursor(row)?.pack()? == token {
            return Ok(Some(index));
        }
    }

    Ok(None)
}
