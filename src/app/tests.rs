use std::cell::Cell;
use std::rc::Rc;

use tempfile::tempdir;

use crate::editor::FormatAction;
use crate::render::{MarkdownRenderer, RenderBridge, RenderError};
use crate::search::SearchStatus;
use crate::sync::{Pane, PaneMetrics};

use super::{App, Message, Model, StartupError, update};

struct MissingRenderer;

impl RenderBridge for MissingRenderer {
    fn name(&self) -> &str {
        "test renderer"
    }

    fn probe(&self) -> Result<(), RenderError> {
        Err(RenderError::Unavailable("highlighter".to_string()))
    }

    fn render(&self, _markdown: &str) -> Result<String, RenderError> {
        unreachable!("never rendered when the probe fails")
    }
}

/// Echoes the text and counts renders; fails on text containing `FAIL`.
struct CountingRenderer {
    renders: Rc<Cell<usize>>,
}

impl RenderBridge for CountingRenderer {
    fn name(&self) -> &str {
        "counting renderer"
    }

    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        self.renders.set(self.renders.get() + 1);
        if markdown.contains("FAIL") {
            return Err(RenderError::Unavailable("FAIL".to_string()));
        }
        Ok(format!("<p>{markdown}</p>"))
    }
}

fn create_test_model() -> Model {
    Model::new(Box::new(MarkdownRenderer::new())).unwrap()
}

fn create_counting_model() -> (Model, Rc<Cell<usize>>) {
    let renders = Rc::new(Cell::new(0));
    let model = Model::new(Box::new(CountingRenderer {
        renders: Rc::clone(&renders),
    }))
    .unwrap();
    (model, renders)
}

fn open(model: Model, name: &str, content: &str) -> Model {
    update(
        model,
        Message::OpenFile {
            name: name.to_string(),
            content: content.to_string(),
        },
    )
}

fn surface_text(model: &Model) -> String {
    model.session.surface().text()
}

#[test]
fn test_new_model_has_one_untitled_tab() {
    let model = create_test_model();
    let bar = model.tab_bar();
    assert_eq!(bar.len(), 1);
    assert_eq!(bar[0].name, "Untitled");
    assert!(bar[0].active);
    assert!(!bar[0].closable);
    assert_eq!(model.stats().words, 0);
    assert_eq!(model.search_status(), SearchStatus::Inactive);
}

#[test]
fn test_startup_fails_without_renderer() {
    let err = Model::new(Box::new(MissingRenderer)).unwrap_err();
    let StartupError::RendererUnavailable { renderer, .. } = &err;
    assert_eq!(renderer, "test renderer");
    let banner = err.to_string();
    assert!(banner.starts_with("Failed to load the required renderer"));
    assert!(banner.contains("highlighter is not available"));
}

#[test]
fn test_open_markdown_file_creates_active_tab() {
    let model = open(create_test_model(), "notes.md", "# Notes\n\nhello world");
    assert_eq!(model.session.len(), 2);
    assert_eq!(model.session.active_tab().unwrap().name(), "notes.md");
    assert_eq!(surface_text(&model), "# Notes\n\nhello world");
    assert!(model.preview_html().contains("<h1>Notes</h1>"));
    assert_eq!(model.stats().words, 4);
}

#[test]
fn test_open_non_markdown_file_is_ignored() {
    let model = open(create_test_model(), "notes.txt", "text");
    assert_eq!(model.session.len(), 1);
    let model = open(model, "NOTES.MD", "text");
    assert_eq!(model.session.len(), 1);
    assert_eq!(surface_text(&model), "");
}

#[test]
fn test_edits_survive_tab_switch() {
    let model = create_test_model();
    let first = model.session.active_id().unwrap();
    let model = update(model, Message::Input("draft one".to_string()));
    let model = update(model, Message::NewTab);
    assert_eq!(surface_text(&model), "");
    assert_eq!(model.stats().words, 0);

    let model = update(model, Message::SwitchTab(first));
    assert_eq!(surface_text(&model), "draft one");
    assert_eq!(model.stats().words, 2);
}

#[test]
fn test_close_last_tab_is_ignored() {
    let model = create_test_model();
    let only = model.session.active_id().unwrap();
    let model = update(model, Message::CloseTab(only));
    assert_eq!(model.session.len(), 1);
    assert_eq!(model.session.active_id(), Some(only));
}

#[test]
fn test_close_active_tab_activates_neighbour_and_renders_it() {
    let model = open(create_test_model(), "a.md", "alpha");
    let model = open(model, "b.md", "beta");
    let b = model.session.active_id().unwrap();
    let model = update(model, Message::CloseTab(b));
    assert_eq!(model.session.active_tab().unwrap().name(), "a.md");
    assert!(model.preview_html().contains("alpha"));
}

#[test]
fn test_every_edit_rerenders() {
    let (model, renders) = create_counting_model();
    assert_eq!(renders.get(), 1);

    let model = update(model, Message::Input("hi".to_string()));
    assert_eq!(renders.get(), 2);
    let model = update(model, Message::InsertText("!".to_string()));
    assert_eq!(renders.get(), 3);
    let model = update(model, Message::Format(FormatAction::Bold));
    assert_eq!(renders.get(), 4);
    assert_eq!(model.preview_html(), format!("<p>{}</p>", surface_text(&model)));
}

#[test]
fn test_selection_change_does_not_rerender() {
    let (model, renders) = create_counting_model();
    let model = update(model, Message::Input("hello".to_string()));
    let before = renders.get();
    let model = update(model, Message::Select(1..3));
    assert_eq!(renders.get(), before);
    assert_eq!(model.session.surface().selection(), 1..3);
}

#[test]
fn test_failed_render_keeps_previous_preview() {
    let (model, _) = create_counting_model();
    let model = update(model, Message::Input("good".to_string()));
    assert_eq!(model.preview_html(), "<p>good</p>");

    let model = update(model, Message::Input("FAIL here".to_string()));
    assert_eq!(model.preview_html(), "<p>good</p>");
    assert_eq!(model.stats().words, 2);
}

#[test]
fn test_format_bold_wraps_selection() {
    let model = update(create_test_model(), Message::Input("make this bold".to_string()));
    let model = update(model, Message::Select(5..9));
    let model = update(model, Message::Format(FormatAction::Bold));
    assert_eq!(surface_text(&model), "make **this** bold");
    assert!(model.preview_html().contains("<strong>this</strong>"));
}

#[test]
fn test_search_highlights_and_steps_through_matches() {
    let model = update(create_test_model(), Message::Input("cat Cat cAt".to_string()));
    let model = update(model, Message::StartSearch);
    assert!(model.search_visible);

    let model = update(model, Message::SearchInput("cat".to_string()));
    assert_eq!(model.search_status().to_string(), "1 of 3");
    assert_eq!(model.session.surface().selection(), 0..3);

    let model = update(model, Message::NextMatch);
    assert_eq!(model.search_status().to_string(), "2 of 3");
    assert_eq!(model.session.surface().selection(), 4..7);

    let model = update(model, Message::PrevMatch);
    let model = update(model, Message::PrevMatch);
    assert_eq!(model.search_status().to_string(), "3 of 3");
    assert_eq!(model.session.surface().selection(), 8..11);
}

#[test]
fn test_case_toggle_rescans() {
    let model = update(create_test_model(), Message::Input("cat Cat cAt".to_string()));
    let model = update(model, Message::SearchInput("cat".to_string()));
    let model = update(model, Message::ToggleCaseSensitive);
    assert!(model.search.case_sensitive());
    assert_eq!(model.search.matches().len(), 1);
    assert_eq!(model.search_status().to_string(), "1 of 1");
}

#[test]
fn test_step_without_matches_is_ignored() {
    let model = update(create_test_model(), Message::Input("abc".to_string()));
    let model = update(model, Message::SearchInput("zzz".to_string()));
    assert_eq!(model.search_status(), SearchStatus::NoResults);
    let model = update(model, Message::NextMatch);
    assert_eq!(model.search_status(), SearchStatus::NoResults);
    assert_eq!(model.session.surface().selection(), 0..0);
}

#[test]
fn test_replace_current_then_all() {
    let model = update(create_test_model(), Message::Input("cat Cat cAt".to_string()));
    let model = update(model, Message::SearchInput("cat".to_string()));
    let model = update(model, Message::ReplaceCurrent("dog".to_string()));
    assert_eq!(surface_text(&model), "dog Cat cAt");
    assert_eq!(model.search_status().to_string(), "1 of 2");
    assert!(model.preview_html().contains("dog Cat cAt"));

    let model = update(model, Message::ReplaceAll("dog".to_string()));
    assert_eq!(surface_text(&model), "dog dog dog");
    assert_eq!(model.search_status(), SearchStatus::NoResults);
    assert!(model.preview_html().contains("dog dog dog"));
}

#[test]
fn test_replace_all_highlights_first_remaining_match() {
    let model = update(create_test_model(), Message::Input("cat cat".to_string()));
    let model = update(model, Message::SearchInput("cat".to_string()));
    let model = update(model, Message::ReplaceAll("concat".to_string()));
    assert_eq!(surface_text(&model), "concat concat");
    assert_eq!(model.search_status().to_string(), "1 of 2");
    let current = model.search.current_match().unwrap().range();
    assert_eq!(current, 3..6);
    assert_eq!(model.session.surface().selection(), current);
}

#[test]
fn test_replace_all_inserts_dollar_literally() {
    let model = update(create_test_model(), Message::Input("price: X".to_string()));
    let model = update(model, Message::SearchInput("X".to_string()));
    let model = update(model, Message::ReplaceAll("$1".to_string()));
    assert_eq!(surface_text(&model), "price: $1");
}

#[test]
fn test_typing_keeps_search_position_clamped() {
    let model = update(create_test_model(), Message::Input("a a a".to_string()));
    let model = update(model, Message::SearchInput("a".to_string()));
    let model = update(model, Message::NextMatch);
    let model = update(model, Message::NextMatch);
    assert_eq!(model.search.current_index(), Some(2));

    let model = update(model, Message::Input("a a".to_string()));
    assert_eq!(model.search.current_index(), Some(1));
    assert_eq!(model.search_status().to_string(), "2 of 2");
}

#[test]
fn test_switching_tabs_reruns_search_from_first_match() {
    let model = open(create_test_model(), "a.md", "x x x");
    let a = model.session.active_id().unwrap();
    let model = open(model, "b.md", "y x");
    let model = update(model, Message::SearchInput("x".to_string()));
    assert_eq!(model.search.matches().len(), 1);

    let model = update(model, Message::SwitchTab(a));
    assert_eq!(model.search.matches().len(), 3);
    assert_eq!(model.search.current_index(), Some(0));
}

#[test]
fn test_close_search_clears_matches_and_selection() {
    let model = update(create_test_model(), Message::Input("cat".to_string()));
    let model = update(model, Message::StartSearch);
    let model = update(model, Message::SearchInput("cat".to_string()));
    assert_eq!(model.session.surface().selection(), 0..3);

    let model = update(model, Message::CloseSearch);
    assert!(!model.search_visible);
    assert_eq!(model.search_status(), SearchStatus::Inactive);
    assert!(model.search.matches().is_empty());
    assert!(model.session.surface().selection().is_empty());
}

fn sized_model() -> Model {
    let model = update(
        create_test_model(),
        Message::PaneResized {
            pane: Pane::Editor,
            scroll_height: 1000.0,
            client_height: 500.0,
        },
    );
    update(
        model,
        Message::PaneResized {
            pane: Pane::Preview,
            scroll_height: 2000.0,
            client_height: 500.0,
        },
    )
}

#[test]
fn test_editor_scroll_moves_preview_proportionally() {
    let model = update(sized_model(), Message::Scrolled(Pane::Editor, 250.0));
    assert_eq!(model.pane(Pane::Editor).scroll_top, 250.0);
    assert_eq!(model.pane(Pane::Preview).scroll_top, 750.0);
    assert!(!model.scroll_sync.is_syncing());
}

#[test]
fn test_preview_scroll_moves_editor() {
    let model = update(sized_model(), Message::Scrolled(Pane::Preview, 1500.0));
    assert_eq!(model.pane(Pane::Editor).scroll_top, 500.0);
}

#[test]
fn test_scroll_sync_toggle() {
    let model = update(sized_model(), Message::ToggleScrollSync);
    assert!(!model.scroll_sync.is_enabled());
    let model = update(model, Message::Scrolled(Pane::Editor, 250.0));
    assert_eq!(model.pane(Pane::Preview).scroll_top, 0.0);

    let model = update(model, Message::ToggleScrollSync);
    let model = update(model, Message::Scrolled(Pane::Editor, 500.0));
    assert_eq!(model.pane(Pane::Preview).scroll_top, 1500.0);
}

#[test]
fn test_scroll_is_clamped_to_content() {
    let model = update(sized_model(), Message::Scrolled(Pane::Editor, 9000.0));
    assert_eq!(model.pane(Pane::Editor).scroll_top, 500.0);
    assert_eq!(model.pane(Pane::Preview).scroll_top, 1500.0);
}

#[test]
fn test_shrinking_pane_clamps_scroll_top() {
    let model = update(sized_model(), Message::Scrolled(Pane::Preview, 1500.0));
    let model = update(
        model,
        Message::PaneResized {
            pane: Pane::Preview,
            scroll_height: 800.0,
            client_height: 500.0,
        },
    );
    assert_eq!(*model.pane(Pane::Preview), PaneMetrics::new(300.0, 800.0, 500.0));
}

#[test]
fn test_resizing_pane_resyncs_other_pane() {
    let model = update(sized_model(), Message::Scrolled(Pane::Editor, 250.0));
    assert_eq!(model.pane(Pane::Preview).scroll_top, 750.0);

    let model = update(
        model,
        Message::PaneResized {
            pane: Pane::Editor,
            scroll_height: 750.0,
            client_height: 500.0,
        },
    );
    assert_eq!(model.pane(Pane::Editor).scroll_top, 250.0);
    assert_eq!(model.pane(Pane::Preview).scroll_top, 1500.0);
}

#[test]
fn test_download_uses_tab_name_or_fallback() {
    let model = update(create_test_model(), Message::Input("# Draft".to_string()));
    let download = model.download().unwrap();
    assert_eq!(download.file_name, "document.md");
    assert_eq!(download.mime, "text/markdown");
    assert_eq!(download.body, "# Draft");

    let model = open(model, "notes.md", "body");
    assert_eq!(model.download().unwrap().file_name, "notes.md");
}

#[test]
fn test_app_run_writes_preview_and_edited_document() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    let doc = src.path().join("notes.md");
    std::fs::write(&doc, "# Notes\n\nold text, old ideas").unwrap();
    let ignored = src.path().join("notes.txt");
    std::fs::write(&ignored, "old").unwrap();

    App::new(vec![doc, ignored])
        .with_find(Some("old".to_string()))
        .with_replace(Some("new".to_string()))
        .with_out_dir(Some(out.path().to_path_buf()))
        .run()
        .unwrap();

    let preview = std::fs::read_to_string(out.path().join("notes.html")).unwrap();
    assert!(preview.contains("<title>notes.md</title>"));
    assert!(preview.contains("<h1>Notes</h1>"));
    assert!(preview.contains("new text, new ideas"));

    let edited = std::fs::read_to_string(out.path().join("notes.md")).unwrap();
    assert_eq!(edited, "# Notes\n\nnew text, new ideas");
    assert!(!out.path().join("notes.txt").exists());
}

#[test]
fn test_app_run_never_overwrites_source_in_out_dir() {
    let src = tempdir().unwrap();
    let doc = src.path().join("notes.md");
    std::fs::write(&doc, "old text").unwrap();

    App::new(vec![doc.clone()])
        .with_find(Some("old".to_string()))
        .with_replace(Some("new".to_string()))
        .with_out_dir(Some(src.path().to_path_buf()))
        .run()
        .unwrap();

    assert_eq!(std::fs::read_to_string(&doc).unwrap(), "old text");
    let preview = std::fs::read_to_string(src.path().join("notes.html")).unwrap();
    assert!(preview.contains("new text"));
}

#[test]
fn test_preview_page_escapes_title() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    let doc = src.path().join("a&b<c>.md");
    std::fs::write(&doc, "body").unwrap();

    App::new(vec![doc])
        .with_out_dir(Some(out.path().to_path_buf()))
        .run()
        .unwrap();

    let preview = std::fs::read_to_string(out.path().join("a&b<c>.html")).unwrap();
    assert!(preview.contains("<title>a&amp;b&lt;c&gt;.md</title>"));
}

#[test]
fn test_app_run_without_replacement_writes_only_preview() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    let doc = src.path().join("readme.md");
    std::fs::write(&doc, "hello").unwrap();

    App::new(vec![doc])
        .with_find(Some("hello".to_string()))
        .with_out_dir(Some(out.path().join("site")))
        .run()
        .unwrap();

    assert!(out.path().join("site").join("readme.html").exists());
    assert!(!out.path().join("site").join("readme.md").exists());
}

#[test]
fn test_app_process_tab_reports_counts() {
    let src = tempdir().unwrap();
    let doc = src.path().join("a.md");
    std::fs::write(&doc, "Cat cat").unwrap();

    let app = App::new(vec![doc.clone()])
        .with_find(Some("cat".to_string()))
        .with_case_sensitive(true);
    let model = open(create_test_model(), "a.md", "Cat cat");
    let opened = super::OpenedFile {
        tab: model.session.active_id().unwrap(),
        path: doc,
    };
    let (model, report) = app.process_tab(model, &opened).unwrap();
    assert_eq!(report.name, "a.md");
    assert_eq!(report.words, 2);
    assert_eq!(report.characters, 7);
    assert_eq!(report.matches, Some(1));
    assert_eq!(report.replaced, 0);
    assert!(report.preview.is_none());
    assert!(!model.search_visible);
    assert_eq!(report.to_string(), "a.md: 2 words, 7 characters; 1 matches");

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["matches"], 1);
    assert!(json.get("preview").is_none());
}

#[test]
fn test_app_run_with_only_ignored_files_is_ok() {
    let src = tempdir().unwrap();
    let path = src.path().join("image.png");
    std::fs::write(&path, [0u8; 4]).unwrap();
    assert!(App::new(vec![path]).run().is_ok());
}
