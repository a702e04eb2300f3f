use bytes::Bytes;
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt};
use opchat_core::event::Event;

use crate::agent::AgentError;
use crate::sse::SseDecoder;

/// Raw response body chunks, as produced by the transport.
pub type ChunkStream<'a> = BoxStream<'a, Result<Bytes, AgentError>>;

/// Decoded protocol events. An `Err` item is a transport failure and
/// terminates the turn.
pub type EventStream<'a> = BoxStream<'a, Result<Event, AgentError>>;

/// Adapts a chunk stream into an event stream by threading every chunk
/// through the SSE decode pipeline.
///
/// Decode-level problems are absorbed inside the pipeline (logged and
/// skipped); only transport errors surface as stream items. When the
/// source ends, an incomplete trailing frame is dropped with the
/// decoder.
pub fn into_event_stream<'a, S>(chunks: S) -> EventStream<'a>
where
    S: Stream<Item = Result<Bytes, AgentError>> + Send + 'a,
{
    let mut decoder = SseDecoder::new();
    chunks
        .map(move |result| match result {
            Ok(bytes) => {
                let events = decoder.push_bytes(&bytes);
                stream::iter(events.into_iter().map(Ok).collect::<Vec<_>>())
            }
            Err(err) => stream::iter(vec![Err(err)]),
        })
        .flatten()
        .boxed()
}
