//! Publish runs against the in-memory service.

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};

use ditapub_confluence::{ContentService, MockCall, MockService, MovePosition, PageId, RemotePage};
use ditapub_sync::{
    ConflictAction, ExecutionMode, OperatorPrompt, PublishOptions, PublishReport, Publisher,
    SyncError, SyncOptions, Toc,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Prompt answering from a script; answers "no"/skip once exhausted.
#[derive(Default)]
struct ScriptedPrompt {
    confirmations: VecDeque<bool>,
    actions: VecDeque<ConflictAction>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    fn confirming(mut self, answer: bool) -> Self {
        self.confirmations.push_back(answer);
        self
    }

    fn acting(mut self, action: ConflictAction) -> Self {
        self.actions.push_back(action);
        self
    }
}

impl OperatorPrompt for ScriptedPrompt {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        self.asked.push(question.to_owned());
        Ok(self.confirmations.pop_front().unwrap_or(false))
    }

    fn resolve_conflict(&mut self, page: &RemotePage) -> io::Result<ConflictAction> {
        self.asked.push(page.title.clone());
        Ok(self.actions.pop_front().unwrap_or(ConflictAction::Skip))
    }
}

const INDEX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<meta name="DC.Title" content="Product Guide"/>
<title>Product Guide</title>
</head>
<body>
<h1>Product Guide</h1>
<ul>
  <li><a href="intro.html">Introduction</a>
    <ul>
      <li><a href="setup.html">Setup</a></li>
    </ul>
  </li>
  <li>Reference<ul>
      <li><a href="topics/api.html">API</a></li>
    </ul>
  </li>
</ul>
</body>
</html>
"#;

const INTRO: &str = r#"<html><head><title>Introduction</title></head><body>
<h1>Introduction</h1>
<p>Welcome.<img src="img/diagram.png"/></p>
<p>See <a class="xref" href="files/sample.conf">the sample</a> and <a href="setup.html">Setup</a>.</p>
</body></html>"#;

const SETUP: &str = r#"<html><head><title>Setup</title></head><body>
<h1>Setup</h1><p>Press <kbd>Enter</kbd>.</p>
</body></html>"#;

const API: &str = r#"<html><head><title>API</title></head><body>
<h1>API</h1><p><img src="../img/diagram.png"/></p>
</body></html>"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let write = |path: &str, content: &[u8]| {
            let path = dir.path().join(path);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        };
        write("index.html", INDEX.as_bytes());
        write("intro.html", INTRO.as_bytes());
        write("setup.html", SETUP.as_bytes());
        write("topics/api.html", API.as_bytes());
        write("img/diagram.png", b"\x89PNG");
        write("files/sample.conf", b"key = value\n");
        Self { dir }
    }

    fn toc(&self) -> Toc {
        Toc::load(&self.path("index.html")).unwrap()
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn space() -> MockService {
    MockService::new("DOC")
        .with_page("1", "Home", None)
        .with_page("10", "Manual", Some("1"))
        .with_home_page("1")
}

fn options() -> PublishOptions {
    PublishOptions {
        space: "DOC".to_owned(),
        root_page: "Manual".to_owned(),
        ..PublishOptions::default()
    }
}

fn publish(
    service: &MockService,
    toc: &mut Toc,
    options: &PublishOptions,
    prompt: &mut ScriptedPrompt,
) -> Result<PublishReport, SyncError> {
    let session = service.login("publisher", "secret").unwrap();
    Publisher::new(service, &session, options).publish(toc, prompt)
}

fn parent_title(service: &MockService, title: &str) -> String {
    let page = service.page_by_title(title).unwrap();
    let parent = page.parent_id.unwrap();
    service
        .pages()
        .into_iter()
        .find(|p| p.id == parent)
        .map(|p| p.title)
        .unwrap()
}

#[test]
fn test_first_run_builds_hierarchy() {
    let fixture = Fixture::new();
    let service = space();

    let report = publish(
        &service,
        &mut fixture.toc(),
        &options(),
        &mut ScriptedPrompt::default(),
    )
    .unwrap();

    assert_eq!(report.sync.created, 5);
    assert_eq!(report.sync.updated, 0);
    assert_eq!(report.sync.attachments, 3);
    assert!(report.obsolete.is_empty());
    assert!(report.unresolved_conflicts.is_empty());

    assert_eq!(parent_title(&service, "Product Guide"), "Manual");
    assert_eq!(parent_title(&service, "Introduction"), "Product Guide");
    assert_eq!(parent_title(&service, "Setup"), "Introduction");
    assert_eq!(parent_title(&service, "Reference"), "Product Guide");
    assert_eq!(parent_title(&service, "API"), "Reference");

    let guide = service.page_by_title("Product Guide").unwrap();
    assert_eq!(service.child_titles(&guide.id), vec!["Introduction", "Reference"]);

    let intro = service.page_by_title("Introduction").unwrap();
    let intro_files: Vec<_> = service
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            MockCall::Attach { page, file_name } if page == intro.id => Some(file_name),
            _ => None,
        })
        .collect();
    assert_eq!(intro_files, vec!["diagram.png", "sample.conf"]);
}

#[test]
fn test_second_run_only_updates() {
    let fixture = Fixture::new();
    let service = space();
    publish(
        &service,
        &mut fixture.toc(),
        &options(),
        &mut ScriptedPrompt::default(),
    )
    .unwrap();
    service.clear_calls();

    let report = publish(
        &service,
        &mut fixture.toc(),
        &options(),
        &mut ScriptedPrompt::default(),
    )
    .unwrap();

    assert_eq!(service.create_count(), 0);
    assert_eq!(report.sync.created, 0);
    assert_eq!(report.sync.updated, 5);
    assert!(report.obsolete.is_empty());
    assert!(report.unresolved_conflicts.is_empty());
    assert!(service.calls().iter().all(|call| match call {
        MockCall::Update { minor_edit, .. } => *minor_edit,
        _ => true,
    }));
}

#[test]
fn test_toc_binds_nodes_to_pages() {
    let fixture = Fixture::new();
    let service = space();
    let mut toc = fixture.toc();

    publish(&service, &mut toc, &options(), &mut ScriptedPrompt::default()).unwrap();

    let setup = &toc.root.children[0].children[0];
    assert_eq!(
        setup.primary_link().and_then(|l| l.source.clone()),
        Some(fixture.path("setup.html"))
    );
    assert_eq!(
        setup.page.as_ref().and_then(|p| p.id().cloned()),
        service.page_by_title("Setup").map(|p| p.id)
    );
}

#[test]
fn test_conflicting_page_moved_under_root() {
    let fixture = Fixture::new();
    let service = space().with_page("50", "SETUP", Some("1"));
    let mut prompt = ScriptedPrompt::default().acting(ConflictAction::Move);

    let report = publish(&service, &mut fixture.toc(), &options(), &mut prompt).unwrap();

    assert_eq!(prompt.asked, vec!["SETUP".to_owned()]);
    assert!(report.unresolved_conflicts.is_empty());
    assert!(service.calls().contains(&MockCall::Move {
        page: PageId::new("50"),
        target: PageId::new("10"),
        position: MovePosition::Append,
    }));
    // The moved page is reused, not duplicated.
    assert!(!service.calls().contains(&MockCall::Create("Setup".to_owned())));
    assert!(service.calls().contains(&MockCall::Update {
        id: PageId::new("50"),
        title: "Setup".to_owned(),
        minor_edit: true,
    }));
    assert_eq!(parent_title(&service, "Setup"), "Introduction");
}

#[test]
fn test_conflicting_page_removed() {
    let fixture = Fixture::new();
    let service = space().with_page("50", "Setup", None);
    let mut prompt = ScriptedPrompt::default().acting(ConflictAction::Remove);

    publish(&service, &mut fixture.toc(), &options(), &mut prompt).unwrap();

    assert!(service.calls().contains(&MockCall::Remove(PageId::new("50"))));
    assert_ne!(service.page_by_title("Setup").unwrap().id, PageId::new("50"));
}

#[test]
fn test_conflict_abort_stops_before_upload() {
    let fixture = Fixture::new();
    let service = space().with_page("50", "Setup", None);
    let mut prompt = ScriptedPrompt::default().acting(ConflictAction::Abort);

    let err = publish(&service, &mut fixture.toc(), &options(), &mut prompt).unwrap_err();

    assert!(matches!(err, SyncError::ConflictingTitle { .. }));
    assert!(service.calls().is_empty());
}

#[test]
fn test_skipped_conflict_makes_upload_fail() {
    let fixture = Fixture::new();
    let service = space().with_page("50", "Setup", None);
    let mut prompt = ScriptedPrompt::default().acting(ConflictAction::Skip);

    let err = publish(&service, &mut fixture.toc(), &options(), &mut prompt).unwrap_err();

    assert!(matches!(err, SyncError::Remote { ref operation, .. } if operation.contains("Setup")));
}

#[test]
fn test_obsolete_pages_reported_and_kept() {
    let fixture = Fixture::new();
    let service = space()
        .with_page("20", "Product Guide", Some("10"))
        .with_page("21", "Old Topic", Some("20"));

    let report = publish(
        &service,
        &mut fixture.toc(),
        &options(),
        &mut ScriptedPrompt::default(),
    )
    .unwrap();

    let obsolete: Vec<_> = report.obsolete.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(obsolete, vec!["Old Topic"]);
    assert!(report.obsolete_deletion.is_none());
    assert!(service.page_by_title("Old Topic").is_some());
}

#[test]
fn test_obsolete_pages_deleted_after_confirmation() {
    let fixture = Fixture::new();
    let service = space()
        .with_page("20", "Product Guide", Some("10"))
        .with_page("21", "Old Topic", Some("20"));
    let options = PublishOptions {
        delete_obsolete: true,
        ..options()
    };
    let mut prompt = ScriptedPrompt::default().confirming(true);

    let report = publish(&service, &mut fixture.toc(), &options, &mut prompt).unwrap();

    assert_eq!(report.obsolete_deletion.unwrap().removed.len(), 1);
    assert!(service.page_by_title("Old Topic").is_none());
}

#[test]
fn test_obsolete_deletion_declined() {
    let fixture = Fixture::new();
    let service = space()
        .with_page("20", "Product Guide", Some("10"))
        .with_page("21", "Old Topic", Some("20"));
    let options = PublishOptions {
        delete_obsolete: true,
        ..options()
    };
    let mut prompt = ScriptedPrompt::default().confirming(false);

    publish(&service, &mut fixture.toc(), &options, &mut prompt).unwrap();

    assert!(service.page_by_title("Old Topic").is_some());
}

#[test]
fn test_clear_space_keeps_root() {
    let fixture = Fixture::new();
    let service = space()
        .with_page("30", "Scratch", None)
        .with_page("31", "Draft", Some("10"));
    let options = PublishOptions {
        clear_space: true,
        ..options()
    };
    let mut prompt = ScriptedPrompt::default().confirming(true);

    let report = publish(&service, &mut fixture.toc(), &options, &mut prompt).unwrap();

    assert_eq!(report.cleared.unwrap().removed.len(), 3);
    assert!(service.page_by_title("Manual").is_some());
    assert!(service.page_by_title("Scratch").is_none());
    assert!(service.page_by_title("Home").is_none());
    assert_eq!(parent_title(&service, "Product Guide"), "Manual");
}

#[test]
fn test_root_page_matched_ignoring_case() {
    let fixture = Fixture::new();
    let service = space();
    let options = PublishOptions {
        root_page: "MANUAL".to_owned(),
        ..options()
    };

    let report = publish(
        &service,
        &mut fixture.toc(),
        &options,
        &mut ScriptedPrompt::default(),
    )
    .unwrap();

    assert_eq!(report.root.unwrap().id, PageId::new("10"));
}

#[test]
fn test_missing_root_page() {
    let fixture = Fixture::new();
    let service = space();
    let options = PublishOptions {
        root_page: "Nowhere".to_owned(),
        ..options()
    };

    let err = publish(
        &service,
        &mut fixture.toc(),
        &options,
        &mut ScriptedPrompt::default(),
    )
    .unwrap_err();

    assert!(matches!(err, SyncError::RootPageNotFound(ref title) if title == "Nowhere"));
}

#[test]
fn test_toc_using_root_title_is_rejected_before_any_question() {
    let fixture = Fixture::new();
    let service = space().with_page("20", "Product Guide", Some("1"));
    let options = PublishOptions {
        root_page: "Product Guide".to_owned(),
        ..options()
    };
    let mut prompt = ScriptedPrompt::default().acting(ConflictAction::Remove);

    let err = publish(&service, &mut fixture.toc(), &options, &mut prompt).unwrap_err();

    assert!(matches!(err, SyncError::RootTitleInToc(ref title) if title == "Product Guide"));
    assert!(prompt.asked.is_empty());
    assert!(service.calls().is_empty());
    assert!(service.page_by_title("Product Guide").is_some());
}

#[test]
fn test_dry_run_changes_nothing() {
    let fixture = Fixture::new();
    let service = space()
        .with_page("50", "Setup", None)
        .with_page("20", "Product Guide", Some("10"))
        .with_page("21", "Old Topic", Some("20"));
    let options = PublishOptions {
        delete_obsolete: true,
        clear_space: true,
        sync: SyncOptions {
            mode: ExecutionMode::Simulate,
            ..SyncOptions::default()
        },
        ..options()
    };
    let mut prompt = ScriptedPrompt::default()
        .confirming(true)
        .acting(ConflictAction::Remove)
        .confirming(true);

    let report = publish(&service, &mut fixture.toc(), &options, &mut prompt).unwrap();

    assert!(service.calls().is_empty());
    assert_eq!(report.sync.created, 4);
    assert_eq!(report.sync.updated, 1);
    assert_eq!(report.sync.attachments, 3);
}

#[test]
fn test_missing_topic_file_is_fatal() {
    let fixture = Fixture::new();
    std::fs::remove_file(fixture.path("setup.html")).unwrap();
    let service = space();

    let err = publish(
        &service,
        &mut fixture.toc(),
        &options(),
        &mut ScriptedPrompt::default(),
    )
    .unwrap_err();

    assert!(matches!(err, SyncError::Io { ref path, .. } if path.ends_with(Path::new("setup.html"))));
}
