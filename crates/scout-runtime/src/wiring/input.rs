//! Resolved-name input: one name per line, optionally followed by the
//! record type it answered with.

use shared_types::{DomainScope, RecordType, Request, Tag};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

/// Source recorded on names read from the input stream.
pub const INPUT_SOURCE: &str = "Input";

/// Parse one input line into a resolved-name request.
///
/// Accepted forms are `name` and `name RRTYPE`; a bare name is taken to be
/// an address answer (`A`). Blank lines, `#` comments, unknown record types
/// and out-of-scope names yield `None`.
pub fn parse_resolved_line(line: &str, scope: &DomainScope) -> Option<Request> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut fields = line.split_whitespace();
    let name = fields.next()?.trim_end_matches('.').to_ascii_lowercase();
    let record = match fields.next() {
        Some(rr) => match rr.parse::<RecordType>() {
            Ok(rr) => rr,
            Err(e) => {
                debug!(line, error = %e, "Skipping input line");
                return None;
            }
        },
        None => RecordType::A,
    };

    let Some(domain) = scope.which_domain(&name) else {
        debug!(name = %name, "Input name not in scope");
        return None;
    };

    Some(
        Request::new(name.clone(), domain)
            .with_tag(Tag::Resolved)
            .with_source(INPUT_SOURCE)
            .with_records(vec![record]),
    )
}

/// Read `reader` to the end, handing every parsed request to `publish`.
///
/// Returns the number of requests produced.
pub async fn read_resolved<R, F>(
    reader: R,
    scope: &DomainScope,
    mut publish: F,
) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(Request),
{
    let mut lines = reader.lines();
    let mut count = 0;
    while let Some(line) = lines.next_line().await? {
        if let Some(req) = parse_resolved_line(&line, scope) {
            publish(req);
            count += 1;
        }
    }
    Ok(count)
}
