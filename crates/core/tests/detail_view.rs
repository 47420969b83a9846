//! Detail view loading, row layout and delete.

mod common;

use common::{record, session, Call, MockApi};
use serde_json::json;

use expo_admin_core::api::ApiError;
use expo_admin_core::locale::Locale;
use expo_admin_core::resource::ResourceKind;
use expo_admin_core::route::Route;
use expo_admin_core::session::Session;
use expo_admin_core::views::{DetailRow, DetailView, Phase};

fn reference_api() -> MockApi {
    MockApi::new().with_record(
        "references",
        3,
        record(json!({
            "id": 3,
            "file": "uploads\\refs\\doc.pdf",
            "name_tk": "Salgy",
            "name_en": "Reference",
            "name_ru": "Ссылка",
            "date": "2024-05-01T00:00:00.000Z"
        })),
    )
}

#[tokio::test]
async fn test_load_without_token_makes_no_request() {
    let api = reference_api();
    let mut view = DetailView::new(ResourceKind::Reference, 3, Locale::En);

    assert_eq!(view.load(&Session::anonymous(), &api).await, Some(Route::Login));
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_rows_merge_locale_triples() {
    let api = reference_api();
    let mut view = DetailView::new(ResourceKind::Reference, 3, Locale::En);
    assert_eq!(view.load(&session(), &api).await, None);
    assert_eq!(view.phase(), &Phase::Ready);

    let rows = view.rows();
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[0],
        DetailRow::File {
            field: "file",
            path: "uploads\\refs\\doc.pdf".into()
        }
    );
    match &rows[1] {
        DetailRow::Localized { base, tk, en, ru } => {
            assert_eq!(base, "name");
            assert_eq!(tk.as_trusted_html(), "Salgy");
            assert_eq!(en.as_trusted_html(), "Reference");
            assert_eq!(ru.as_trusted_html(), "Ссылка");
        }
        other => panic!("expected localized row, got {other:?}"),
    }
    assert_eq!(
        rows[2],
        DetailRow::Plain {
            field: "date",
            value: "2024-05-01".into()
        }
    );
}

#[tokio::test]
async fn test_project_rows_include_organizers() {
    let api = MockApi::new().with_record(
        "projects",
        1,
        record(json!({
            "id": 1,
            "tk": "<p>Sergi</p>",
            "organizers": "[{\"id\":4,\"organizer_tk\":\"A\",\"organizer_en\":\"B\",\"organizer_ru\":\"C\"}]"
        })),
    );
    let mut view = DetailView::new(ResourceKind::Project, 1, Locale::Tk);
    view.load(&session(), &api).await;

    let organizers = view
        .rows()
        .into_iter()
        .find_map(|row| match row {
            DetailRow::Organizers(entries) => Some(entries),
            _ => None,
        })
        .expect("organizer row");
    assert_eq!(organizers.len(), 1);
    assert_eq!(organizers[0].0, 0);
    assert_eq!(organizers[0].1.id, Some(4));
    assert_eq!(organizers[0].1.organizer_en, "B");
}

#[tokio::test]
async fn test_organizer_numbers_match_stored_rows() {
    let api = MockApi::new().with_record(
        "projects",
        1,
        record(json!({
            "id": 1,
            "organizers": [
                {"id": 4, "organizer_tk": "", "organizer_en": "", "organizer_ru": ""},
                {"id": 5, "organizer_en": "Chamber"}
            ]
        })),
    );
    let mut view = DetailView::new(ResourceKind::Project, 1, Locale::En);
    view.load(&session(), &api).await;

    let organizers = view
        .rows()
        .into_iter()
        .find_map(|row| match row {
            DetailRow::Organizers(entries) => Some(entries),
            _ => None,
        })
        .expect("organizer row");
    let numbered: Vec<(usize, Option<i64>)> =
        organizers.iter().map(|(index, entry)| (*index, entry.id)).collect();
    assert_eq!(numbered, vec![(1, Some(5))]);
}

#[tokio::test]
async fn test_missing_record_shows_load_error() {
    let api = MockApi::new();
    let mut view = DetailView::new(ResourceKind::Slider, 9, Locale::En);

    assert_eq!(view.load(&session(), &api).await, None);
    assert_eq!(view.phase(), &Phase::Failed("Failed to load data".into()));
    assert!(view.rows().is_empty());
}

#[tokio::test]
async fn test_empty_record_is_not_found() {
    let api = MockApi::new().with_record("sliders", 9, record(json!({})));
    let mut view = DetailView::new(ResourceKind::Slider, 9, Locale::Ru);

    view.load(&session(), &api).await;
    assert_eq!(view.phase(), &Phase::Failed("Данные не найдены".into()));
}

#[tokio::test]
async fn test_unauthorized_detail_redirects() {
    let api = MockApi::new().with_record_error("press", 2, ApiError::Unauthorized);
    let mut view = DetailView::new(ResourceKind::Press, 2, Locale::En);

    assert_eq!(view.load(&session(), &api).await, Some(Route::Login));
    assert!(view.record().is_none());
}

#[tokio::test]
async fn test_edit_route() {
    let view = DetailView::new(ResourceKind::Reference, 3, Locale::En);
    assert_eq!(view.edit_route().path(), "/admin/reference/edit-reference/3");
}

#[tokio::test]
async fn test_delete_navigates_to_list() {
    let api = reference_api();
    let mut view = DetailView::new(ResourceKind::Reference, 3, Locale::En);
    view.load(&session(), &api).await;

    assert!(view.request_delete());
    let route = view.confirm_delete(&session(), &api).await;

    assert_eq!(route, Some(Route::List(ResourceKind::Reference)));
    assert_eq!(api.calls().last(), Some(&Call::Remove("references", 3)));
}

#[tokio::test]
async fn test_failed_delete_stays_on_page() {
    let api = reference_api().failing_writes(ApiError::Transport("reset".into()));
    let mut view = DetailView::new(ResourceKind::Reference, 3, Locale::En);
    view.load(&session(), &api).await;

    view.request_delete();
    assert_eq!(view.confirm_delete(&session(), &api).await, None);
    assert!(view.record().is_some());
    assert_eq!(view.notice(), Some("Failed to delete"));
    assert!(!view.delete_state().dialog_open());
}
