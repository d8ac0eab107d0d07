use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, DragEvent, Element, KeyboardEvent, Node};

use super::browser::BrowserService;
use super::{dom_error, on, query_all, query_one, query_within};
use crate::config::SortableTableConfig;
use crate::reorder::{move_row, DragOutcome, DragSession, ReorderController};
use crate::services::{http, FormRequest, PageContext, WidgetError, WidgetResult};
use crate::table_sort::{Row, TableSortState};
use crate::templates::table_template::{render_drag_handle, sort_attributes, DRAG_HANDLE_CLASS};

const REORDER_BODY: &str = "#result_list tbody";

pub(super) fn attach(document: &Document, ctx: &Rc<PageContext>) {
    for table in query_all(document, "table[data-table]") {
        if let Err(err) = attach_sortable(&table) {
            warn!(error = %err, "sortable table not attached");
        }
    }
    for body in query_all(document, REORDER_BODY) {
        attach_reorder(&body, ctx);
    }
}

fn attach_sortable(table: &Element) -> WidgetResult<()> {
    let headers = query_within(table, "th[data-sortable]");
    let columns: Vec<String> = headers
        .iter()
        .filter_map(|header| header.get_attribute("data-sortable"))
        .collect();
    let config = SortableTableConfig::from_header_attributes(columns.iter().map(String::as_str))?;
    debug!(columns = ?config.sortable_columns, "sortable table");
    let state = Rc::new(RefCell::new(TableSortState::new(config)));

    for (header, number) in headers.iter().zip(&columns) {
        let Some(column) = number.trim().parse::<usize>().ok().and_then(|n| n.checked_sub(1)) else {
            continue;
        };
        let table = table.clone();
        let state = state.clone();
        let clicked = header.clone();
        on(header, "click", move |_: web_sys::Event| {
            if let Err(err) = sort_table(&table, &clicked, &state, column) {
                warn!(column, error = %err, "sort failed");
            }
        });
    }
    Ok(())
}

fn sort_table(
    table: &Element,
    clicked: &Element,
    state: &RefCell<TableSortState>,
    column: usize,
) -> WidgetResult<()> {
    let body = query_one(table, "tbody")
        .ok_or_else(|| WidgetError::Dom("sortable table has no tbody".into()))?;
    let elements = body_rows(&body);
    let rows: Vec<Row> = elements
        .iter()
        .map(|row| Row::new(row.get_attribute("data-id").as_deref(), cell_texts(row)))
        .collect();

    let order = state.borrow_mut().sort_by_column(&rows, column)?;
    for index in order {
        body.append_child(&elements[index])
            .map_err(|err| dom_error("re-attaching row", err))?;
    }

    for header in query_within(table, "th[data-sortable]") {
        let _ = header.remove_attribute("data-sort");
        let _ = header.remove_attribute("aria-sort");
    }
    if let Some(direction) = state.borrow().indicator(column) {
        let (data_sort, aria_sort) = sort_attributes(direction);
        clicked
            .set_attribute("data-sort", data_sort)
            .and_then(|_| clicked.set_attribute("aria-sort", aria_sort))
            .map_err(|err| dom_error("sort indicator", err))?;
    }
    Ok(())
}

fn body_rows(body: &Element) -> Vec<Element> {
    let children = body.children();
    (0..children.length())
        .filter_map(|index| children.item(index))
        .filter(|child| child.tag_name().eq_ignore_ascii_case("tr"))
        .collect()
}

fn cell_texts(row: &Element) -> Vec<String> {
    let cells = row.children();
    (0..cells.length())
        .filter_map(|index| cells.item(index))
        .map(|cell| {
            cell.text_content()
                .unwrap_or_default()
                .replace('\u{2195}', "")
                .trim()
                .to_string()
        })
        .collect()
}

fn row_id(row: &Element) -> String {
    query_one(row, ".id")
        .and_then(|cell| cell.text_content())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .or_else(|| row.get_attribute("data-id"))
        .unwrap_or_default()
}

struct ReorderView {
    ctx: Rc<PageContext>,
    body: Element,
    controller: ReorderController<BrowserService>,
    dragging: Option<Drag>,
}

struct Drag {
    row: Element,
    start_rows: Vec<Element>,
    session: DragSession,
}

fn attach_reorder(body: &Element, ctx: &Rc<PageContext>) {
    let rows = body_rows(body);
    for row in &rows {
        if let Some(first) = query_one(row, "td, th") {
            if let Err(err) = first.insert_adjacent_html("afterbegin", &render_drag_handle()) {
                warn!(error = ?err, "could not add drag handle");
            }
        }
    }
    let anchor = body.closest("table").ok().flatten().unwrap_or_else(|| body.clone());
    let view = Rc::new(RefCell::new(ReorderView {
        ctx: ctx.clone(),
        body: body.clone(),
        controller: ReorderController::new(BrowserService::anchored(&anchor)),
        dragging: None,
    }));
    info!(rows = rows.len(), "drag reorder attached");

    {
        let view = view.clone();
        on(body, "dragstart", move |event: DragEvent| {
            let Some(row) = handle_row(event.target()) else {
                return;
            };
            if let Some(transfer) = event.data_transfer() {
                transfer.set_effect_allowed("move");
                let _ = transfer.set_data("text/plain", &row_id(&row));
            }
            let _ = row.class_list().add_1("dragging");
            let mut view = view.borrow_mut();
            let start_rows = body_rows(&view.body);
            let session = DragSession::begin(start_rows.iter().map(row_id).collect());
            view.dragging = Some(Drag {
                row,
                start_rows,
                session,
            });
        });
    }
    {
        let view = view.clone();
        on(body, "dragover", move |event: DragEvent| {
            let view = view.borrow();
            let Some(dragging) = view.dragging.as_ref().map(|drag| &drag.row) else {
                return;
            };
            event.prevent_default();
            let Some(target) = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|element| element.closest("tr").ok().flatten())
            else {
                return;
            };
            if &target == dragging {
                return;
            }
            let rect = target.get_bounding_client_rect();
            let after = f64::from(event.client_y()) > rect.top() + rect.height() / 2.0;
            let reference = if after { target.next_sibling() } else { Some(Node::from(target)) };
            if let Err(err) = view.body.insert_before(dragging, reference.as_ref()) {
                warn!(error = ?err, "could not move dragged row");
            }
        });
    }
    {
        let view = view.clone();
        on(body, "drop", move |event: DragEvent| {
            if let Some(drag) = view.borrow_mut().dragging.as_mut() {
                event.prevent_default();
                drag.session.mark_dropped();
            }
        });
    }
    {
        let view = view.clone();
        on(body, "dragend", move |_: DragEvent| {
            let finished = view.borrow_mut().dragging.take();
            if let Some(drag) = finished {
                let _ = drag.row.class_list().remove_1("dragging");
                finish_drag(&view, drag);
            }
        });
    }
    {
        let view = view.clone();
        on(body, "keydown", move |event: KeyboardEvent| {
            let step: isize = match event.key().as_str() {
                "ArrowUp" if event.alt_key() => -1,
                "ArrowDown" if event.alt_key() => 1,
                _ => return,
            };
            let Some(row) = handle_row(event.target()) else {
                return;
            };
            event.prevent_default();
            if let Err(err) = move_by_keyboard(&view, &row, step) {
                debug!(error = %err, "keyboard move ignored");
            }
        });
    }
}

fn finish_drag(view: &Rc<RefCell<ReorderView>>, drag: Drag) {
    let body = view.borrow().body.clone();
    let ids: Vec<String> = body_rows(&body).iter().map(row_id).collect();
    match drag.session.finish(&ids) {
        DragOutcome::Submit => submit_order(view),
        DragOutcome::Unchanged => debug!("row dropped in place"),
        DragOutcome::Restore => {
            debug!("drag cancelled, restoring rows");
            for row in &drag.start_rows {
                if let Err(err) = body.append_child(row) {
                    warn!(error = ?err, "could not restore row");
                }
            }
        }
    }
}

fn handle_row(target: Option<web_sys::EventTarget>) -> Option<Element> {
    let element = target?.dyn_into::<Element>().ok()?;
    if !element.class_list().contains(DRAG_HANDLE_CLASS) {
        return None;
    }
    element.closest("tr").ok().flatten()
}

fn move_by_keyboard(view: &Rc<RefCell<ReorderView>>, row: &Element, step: isize) -> WidgetResult<()> {
    let body = view.borrow().body.clone();
    let mut rows = body_rows(&body);
    let from = rows
        .iter()
        .position(|candidate| candidate == row)
        .ok_or_else(|| WidgetError::Dom("row is not in the reorder table".into()))?;
    let to = from
        .checked_add_signed(step)
        .ok_or_else(|| WidgetError::ValidationFailure("row is already first".into()))?;
    move_row(&mut rows, from, to)?;
    for element in &rows {
        body.append_child(element)
            .map_err(|err| dom_error("re-attaching row", err))?;
    }
    if let Some(handle) = query_one(row, &format!(".{DRAG_HANDLE_CLASS}")) {
        if let Ok(handle) = handle.dyn_into::<web_sys::HtmlElement>() {
            let _ = handle.focus();
        }
    }
    submit_order(view);
    Ok(())
}

fn submit_order(view: &Rc<RefCell<ReorderView>>) {
    let request = {
        let mut guard = view.borrow_mut();
        let ids: Vec<String> = body_rows(&guard.body).iter().map(row_id).collect();
        let ctx = guard.ctx.clone();
        guard.controller.on_drop(&ctx, ids)
    };
    match request {
        Ok(Some(request)) => send_order(view.clone(), request),
        Ok(None) => {}
        Err(err) => warn!(error = %err, "reorder not sent"),
    }
}

fn send_order(view: Rc<RefCell<ReorderView>>, request: FormRequest) {
    wasm_bindgen_futures::spawn_local(async move {
        let mut next = Some(request);
        while let Some(request) = next.take() {
            let result = http::send(&request).await.map(|_| ());
            let mut guard = view.borrow_mut();
            let ctx = guard.ctx.clone();
            match guard.controller.on_complete(&ctx, result) {
                Ok(parked) => next = parked,
                Err(err) => warn!(error = %err, "parked reorder not sent"),
            }
        }
    });
}
