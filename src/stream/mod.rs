//! Admin enrichment of a document stream.

use crate::document::Document;
use crate::error::ResolveError;
use crate::placetype::Placetype;
use crate::resolver::{LookupResult, Resolver};
use futures_util::stream::{self, Stream, StreamExt};
use tracing::error;

/// Resolves each document's centroid and writes the admin hierarchy into it.
///
/// One document is in flight at a time, so output order is input order.
/// Documents without a centroid pass through untouched. The first resolver
/// error is yielded in place of its document and ends the stream.
pub fn create_lookup_stream<R, S>(
    resolver: R,
    documents: S,
) -> impl Stream<Item = Result<Document, ResolveError>>
where
    R: Resolver,
    S: Stream<Item = Document>,
{
    stream::unfold(
        Some((Box::pin(documents), resolver)),
        |state| async move {
            let (mut documents, resolver) = state?;
            let mut document = documents.next().await?;
            let centroid = match document.centroid {
                Some(centroid) => centroid,
                None => return Some((Ok(document), Some((documents, resolver)))),
            };
            match resolver.resolve(centroid).await {
                Ok(result) => {
                    enrich(&mut document, &result);
                    Some((Ok(document), Some((documents, resolver))))
                }
                Err(e) => {
                    error!(source_id = %document.source_id, error = %e, "admin lookup failed");
                    Some((Err(e), None))
                }
            }
        },
    )
}

/// Per level, country first: the first candidate names the admin field,
/// every candidate becomes a parent. Levels missing from the result are
/// left alone.
pub fn enrich(document: &mut Document, result: &LookupResult) {
    for placetype in Placetype::all() {
        let candidates = match result.get(*placetype) {
            Some(candidates) if !candidates.is_empty() => candidates,
            _ => continue,
        };
        document.set_admin(*placetype, &candidates[0].name);
        for candidate in candidates {
            document.add_parent(*placetype, &candidate.name, &candidate.id.to_string());
        }
    }
}
