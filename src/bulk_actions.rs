use tracing::{info, warn};

use crate::services::{FormRequest, Notice, PageContext, PageService, WidgetResult};

pub struct BulkActionController<S: PageService> {
    service: S,
}

impl<S: PageService> BulkActionController<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Action select changed. Returns the request to send once the user has
    /// confirmed, or `None` when there is nothing to do.
    pub fn on_action_change(
        &self,
        ctx: &PageContext,
        action: &str,
        selected_ids: &[String],
    ) -> WidgetResult<Option<FormRequest>> {
        if action.is_empty() || selected_ids.is_empty() {
            return Ok(None);
        }
        if !self.service.confirm(&ctx.config.bulk_confirm_message) {
            return Ok(None);
        }
        info!(action, count = selected_ids.len(), "submitting bulk comment action");
        let request = selected_ids.iter().fold(
            FormRequest::post(ctx.page_url.clone()).field("action", action),
            |request, id| request.field("ids[]", id.clone()),
        );
        Ok(Some(request.with_csrf(ctx.csrf_token.as_deref())))
    }

    pub fn on_complete(&self, result: WidgetResult<()>) {
        match result {
            Ok(()) => self.service.reload(),
            Err(err) => {
                warn!(error = %err, "bulk comment action failed");
                self.service
                    .notify(Notice::error(format!("The action could not be applied: {err}")));
            }
        }
    }
}
