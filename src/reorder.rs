use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::services::{FormRequest, Notice, PageContext, PageService, WidgetError, WidgetResult};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OrderEntry {
    pub id: String,
    pub order: usize,
}

/// Payload for the ids in their final visual order.
pub fn build_payload<I, S>(ids: I) -> Vec<OrderEntry>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ids.into_iter()
        .enumerate()
        .map(|(order, id)| OrderEntry {
            id: id.into(),
            order,
        })
        .collect()
}

/// Moves the item at `from` so that it ends up at index `to`.
pub fn move_row<T>(items: &mut Vec<T>, from: usize, to: usize) -> WidgetResult<()> {
    if from >= items.len() || to >= items.len() {
        return Err(WidgetError::ValidationFailure(format!(
            "cannot move row {from} to {to} in a table of {} rows",
            items.len()
        )));
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

pub fn reorder_request(ctx: &PageContext, payload: &[OrderEntry]) -> WidgetResult<FormRequest> {
    let url = ctx.endpoint(&ctx.config.reorder_suffix)?;
    let order = serde_json::to_string(payload)
        .map_err(|err| WidgetError::ParseFailure(format!("reorder payload: {err}")))?;
    Ok(FormRequest::post(url)
        .field("order", order)
        .with_csrf(ctx.csrf_token.as_deref()))
}

/// What to do once a drag gesture ends.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DragOutcome {
    Submit,
    Unchanged,
    /// The drag ended outside the table or was aborted; the rows go back.
    Restore,
}

/// Row order captured at `dragstart`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DragSession {
    start: Vec<String>,
    dropped: bool,
}

impl DragSession {
    pub fn begin(ids: Vec<String>) -> Self {
        Self {
            start: ids,
            dropped: false,
        }
    }

    pub fn mark_dropped(&mut self) {
        self.dropped = true;
    }

    pub fn finish(&self, ids: &[String]) -> DragOutcome {
        if !self.dropped {
            DragOutcome::Restore
        } else if self.start.as_slice() == ids {
            DragOutcome::Unchanged
        } else {
            DragOutcome::Submit
        }
    }
}

/// Drop handling with a single request in flight at a time. A drop that
/// arrives while a request is pending is parked; only the newest parked
/// payload is sent once the pending request settles.
pub struct ReorderController<S: PageService> {
    service: S,
    in_flight: bool,
    parked: Option<Vec<OrderEntry>>,
}

impl<S: PageService> ReorderController<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            in_flight: false,
            parked: None,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Called with the row ids in final DOM order; returns the request to
    /// send now, if any.
    pub fn on_drop<I, T>(&mut self, ctx: &PageContext, ids: I) -> WidgetResult<Option<FormRequest>>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let payload = build_payload(ids);
        if payload.iter().any(|entry| entry.id.trim().is_empty()) {
            return Err(WidgetError::ValidationFailure(
                "every row needs an id to be reordered".into(),
            ));
        }
        if self.in_flight {
            debug!(rows = payload.len(), "reorder request pending, parking payload");
            self.parked = Some(payload);
            return Ok(None);
        }
        let request = reorder_request(ctx, &payload)?;
        self.in_flight = true;
        Ok(Some(request))
    }

    /// Settles the in-flight request and returns the parked follow-up, if any.
    pub fn on_complete(
        &mut self,
        ctx: &PageContext,
        result: WidgetResult<()>,
    ) -> WidgetResult<Option<FormRequest>> {
        self.in_flight = false;
        if let Err(err) = result {
            warn!(error = %err, "reorder request failed; server keeps the previous order");
            self.service.notify(Notice::error(format!(
                "The new order could not be saved ({err}). Reload the page to see the stored order."
            )));
        }
        match self.parked.take() {
            Some(payload) => {
                let request = reorder_request(ctx, &payload)?;
                self.in_flight = true;
                Ok(Some(request))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{InMemoryService, NoticeLevel, CSRF_FIELD};
    use pretty_assertions::assert_eq;

    fn ctx() -> PageContext {
        PageContext::new(
            "https://cms.local/admin/pages/page/?p=2",
            Some("csrf-123".into()),
        )
    }

    fn decoded_order(request: &FormRequest) -> Vec<OrderEntry> {
        serde_json::from_str(request.value("order").unwrap()).unwrap()
    }

    #[test]
    fn payload_positions_are_dense() {
        let payload = build_payload(["7", "3", "9", "1"]);
        let orders: Vec<usize> = payload.iter().map(|entry| entry.order).collect();
        let ids: Vec<&str> = payload.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
        assert_eq!(ids, vec!["7", "3", "9", "1"]);
    }

    #[test]
    fn move_row_places_item_at_target() {
        let mut ids = vec!["a", "b", "c", "d"];
        move_row(&mut ids, 0, 2).unwrap();
        assert_eq!(ids, vec!["b", "c", "a", "d"]);
        move_row(&mut ids, 3, 0).unwrap();
        assert_eq!(ids, vec!["d", "b", "c", "a"]);
        assert!(move_row(&mut ids, 4, 0).is_err());
    }

    #[test]
    fn drop_builds_request_with_token() {
        let mut controller = ReorderController::new(InMemoryService::default());
        let request = controller.on_drop(&ctx(), ["2", "1"]).unwrap().unwrap();
        assert_eq!(request.url, "https://cms.local/admin/pages/page/reorder/");
        assert_eq!(request.value(CSRF_FIELD), Some("csrf-123"));
        assert_eq!(request.value("order"), Some(r#"[{"id":"2","order":0},{"id":"1","order":1}]"#));
        assert!(controller.in_flight());
    }

    #[test]
    fn drops_while_in_flight_send_only_the_latest() {
        let mut controller = ReorderController::new(InMemoryService::default());
        let ctx = ctx();
        assert!(controller.on_drop(&ctx, ["1", "2", "3"]).unwrap().is_some());
        assert!(controller.on_drop(&ctx, ["2", "1", "3"]).unwrap().is_none());
        assert!(controller.on_drop(&ctx, ["3", "2", "1"]).unwrap().is_none());

        let follow_up = controller.on_complete(&ctx, Ok(())).unwrap().unwrap();
        let ids: Vec<String> = decoded_order(&follow_up).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
        assert!(controller.in_flight());

        assert!(controller.on_complete(&ctx, Ok(())).unwrap().is_none());
        assert!(!controller.in_flight());
    }

    #[test]
    fn failure_surfaces_notice_without_rollback() {
        let service = InMemoryService::default();
        let mut controller = ReorderController::new(service.clone());
        let ctx = ctx();
        controller.on_drop(&ctx, ["1", "2"]).unwrap();
        let next = controller
            .on_complete(&ctx, Err(WidgetError::NetworkFailure("HTTP 500".into())))
            .unwrap();
        assert!(next.is_none());
        let notices = service.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(!controller.in_flight());
    }

    fn owned(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn drag_session_submits_only_moved_drops() {
        let mut session = DragSession::begin(owned(&["1", "2", "3"]));
        assert_eq!(session.finish(&owned(&["2", "1", "3"])), DragOutcome::Restore);
        session.mark_dropped();
        assert_eq!(session.finish(&owned(&["1", "2", "3"])), DragOutcome::Unchanged);
        assert_eq!(session.finish(&owned(&["2", "1", "3"])), DragOutcome::Submit);
    }

    #[test]
    fn rows_without_ids_are_rejected() {
        let mut controller = ReorderController::new(InMemoryService::default());
        assert!(controller.on_drop(&ctx(), ["1", " "]).is_err());
        assert!(!controller.in_flight());
    }
}
