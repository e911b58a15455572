mod common;

use common::{device, device_with, fleet};
use sensortui::record::DeviceStatus;
use sensortui::selection::HeaderCheck;
use sensortui::view::derive_view;
use sensortui::{
    FilterMode, Record, SortDirection, SortField, TableController, TableView, ViewAction,
    ViewState,
};

fn ids(view: &TableView) -> Vec<i64> {
    view.rows.iter().map(|r| r.record.id).collect()
}

fn names(view: &TableView) -> Vec<String> {
    view.rows.iter().map(|r| r.record.name.clone()).collect()
}

fn loaded(records: Vec<Record>) -> TableController {
    let mut controller = TableController::default();
    controller.replace_records(records);
    controller
}

#[test]
fn test_equal_ids_keep_input_order() {
    let records = vec![device(1, "A"), device(2, "B"), device(1, "A2")];
    let view = derive_view(&records, &ViewState::default(), FilterMode::Literal);
    assert_eq!(names(&view), vec!["A", "A2", "B"]);

    // Descending reverses the comparator but ties still keep input order.
    let state = ViewState::default().apply(
        ViewAction::RequestSort(SortField::Id),
        &records,
        FilterMode::Literal,
    );
    assert_eq!(state.order(), SortDirection::Desc);
    let view = derive_view(&records, &state, FilterMode::Literal);
    assert_eq!(names(&view), vec!["B", "A", "A2"]);
}

#[test]
fn test_literal_filter_escapes_metacharacters() {
    let mut controller = loaded(vec![
        device(1, "sensor.1"),
        device(2, "sensor21"),
        device(3, "other"),
    ]);
    controller.dispatch(ViewAction::SetFilterText("sensor.1".to_string()));
    assert_eq!(names(controller.view()), vec!["sensor.1"]);

    controller.set_filter_mode(FilterMode::Regex);
    assert_eq!(names(controller.view()), vec!["sensor.1", "sensor21"]);
}

#[test]
fn test_last_page_is_padded() {
    let mut controller = loaded(fleet(7));
    controller.dispatch(ViewAction::ChangePage(1));
    let view = controller.view();
    assert_eq!(ids(view), vec![6, 7]);
    assert_eq!(view.empty_rows, 3);
    assert_eq!(view.displayed_rows_label(), "6–7 of 7");
}

#[test]
fn test_selection_keeps_order_and_survives_select_all() {
    let records = vec![device(1, "X"), device(2, "Y"), device(3, "Z")];
    let mut controller = loaded(records);
    controller.dispatch(ViewAction::ToggleSelect(1));
    controller.dispatch(ViewAction::SelectAll(true));
    assert_eq!(controller.state().selected.as_slice(), &[1, 2, 3]);
    controller.dispatch(ViewAction::ToggleSelect(1));
    assert_eq!(controller.state().selected.as_slice(), &[2, 3]);
    assert_eq!(controller.view().header_check(), HeaderCheck::Indeterminate);

    controller.dispatch(ViewAction::SelectAll(false));
    assert!(controller.state().selected.is_empty());
    assert_eq!(controller.view().header_check(), HeaderCheck::Unchecked);
}

#[test]
fn test_select_all_only_covers_filtered_devices() {
    let mut controller = loaded(fleet(12));
    controller.dispatch(ViewAction::SetFilterText("sensor-1".to_string()));
    // sensor-1, sensor-10, sensor-11, sensor-12
    assert_eq!(controller.view().total_filtered, 4);
    controller.dispatch(ViewAction::SelectAll(true));
    assert_eq!(controller.state().selected.as_slice(), &[1, 10, 11, 12]);
    assert!(controller.view().all_selected());

    // Selection outlives the filter that produced it.
    controller.dispatch(ViewAction::SetFilterText(String::new()));
    let view = controller.view();
    assert_eq!(view.header_check(), HeaderCheck::Indeterminate);
    assert!(view.rows[0].selected);
    assert!(!view.rows[1].selected);
}

#[test]
fn test_filter_reset_restores_every_device() {
    let mut controller = loaded(fleet(30));
    for text in ["s", "se", "sensor-2", "sensor-2x", "sensor-2", "sensor", ""] {
        controller.dispatch(ViewAction::SetFilterText(text.to_string()));
    }
    assert_eq!(controller.view().total_filtered, 30);
    assert_eq!(controller.records().len(), 30);
}

#[test]
fn test_filter_clamps_page() {
    let mut controller = loaded(fleet(30));
    controller.dispatch(ViewAction::ChangePage(5));
    assert_eq!(controller.state().page, 5);
    controller.dispatch(ViewAction::SetFilterText("sensor-1".to_string()));
    // sensor-1 and sensor-10..=19 fit on three pages of five
    assert_eq!(controller.view().total_filtered, 11);
    assert_eq!(controller.state().page, 2);
    assert_eq!(ids(controller.view()), vec![19]);
}

#[test]
fn test_new_data_keeps_view_state() {
    let mut controller = loaded(fleet(20));
    controller.dispatch(ViewAction::ToggleSelect(3));
    controller.dispatch(ViewAction::ToggleExpand(4));
    controller.dispatch(ViewAction::ChangePage(3));

    controller.replace_records(fleet(8));
    assert_eq!(controller.state().page, 1);
    assert!(controller.state().selected.contains(&3));
    assert!(controller.state().expanded.contains(&4));
    assert_eq!(ids(controller.view()), vec![6, 7, 8]);
    assert_eq!(controller.generation(), 2);
}

#[test]
fn test_sort_by_status_then_temperature() {
    let records = vec![
        device_with(1, "a", 30.0, DeviceStatus::Healthy),
        device_with(2, "b", 10.0, DeviceStatus::Error),
        device_with(3, "c", 20.0, DeviceStatus::Connected),
    ];
    let mut controller = loaded(records);
    controller.dispatch(ViewAction::RequestSort(SortField::Status));
    assert_eq!(names(controller.view()), vec!["c", "b", "a"]);

    controller.dispatch(ViewAction::RequestSort(SortField::CurrentTemperature));
    assert_eq!(controller.state().order(), SortDirection::Asc);
    assert_eq!(names(controller.view()), vec!["b", "c", "a"]);
    controller.dispatch(ViewAction::RequestSort(SortField::CurrentTemperature));
    assert_eq!(names(controller.view()), vec!["a", "c", "b"]);
}

#[test]
fn test_pages_cover_the_filtered_sequence() {
    for page_size in [5usize, 10, 25] {
        for n in 0..50i64 {
            let records = fleet(n);
            let base = ViewState::default()
                .with_page_size(page_size)
                .apply(
                    ViewAction::RequestSort(SortField::Name),
                    &records,
                    FilterMode::Literal,
                );
            let full = derive_view(
                &records,
                &base.clone().with_page_size(usize::MAX),
                FilterMode::Literal,
            );

            let pages = derive_view(&records, &base, FilterMode::Literal).page_count();
            let mut seen = Vec::new();
            for page in 0..pages {
                let state =
                    base.apply(ViewAction::ChangePage(page), &records, FilterMode::Literal);
                let view = derive_view(&records, &state, FilterMode::Literal);
                assert!(view.rows.len() <= page_size);
                if page > 0 {
                    assert_eq!(view.rows.len() + view.empty_rows, page_size);
                } else {
                    assert_eq!(view.empty_rows, 0);
                }
                seen.extend(ids(&view));
            }
            assert_eq!(seen, ids(&full), "page_size {} n {}", page_size, n);
        }
    }
}

#[test]
fn test_negative_ids_sort_and_select() {
    let mut controller = loaded(vec![device(3, "c"), device(-5, "a"), device(-1, "b")]);
    assert_eq!(ids(controller.view()), vec![-5, -1, 3]);
    controller.dispatch(ViewAction::ToggleSelect(-1));
    controller.dispatch(ViewAction::ToggleExpand(-5));
    let view = controller.view();
    assert!(view.rows[0].expanded);
    assert!(view.rows[1].selected);
}
