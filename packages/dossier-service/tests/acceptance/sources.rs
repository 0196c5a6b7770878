use serde_json::json;

use dossier_domain::kinds::SourceType;
use dossier_service::{
	DeleteSourceRequest, Error, GetProjectRequest, SaveNoteRequest, SaveSourceRequest,
};

fn new_source(project_id: i64, title: &str) -> SaveSourceRequest {
	SaveSourceRequest {
		id: None,
		project_id,
		source_type: None,
		title: title.to_string(),
		url: None,
		citation_text: None,
		citation_meta: None,
		snippet: None,
		metadata: None,
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DOSSIER_PG_DSN to run."]
async fn save_source_inserts_then_replaces() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping save_source_inserts_then_replaces; set DOSSIER_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let ctx = super::user("user-a");
	let project = super::create_project(&service, &ctx, "Essay").await;
	let created = service
		.save_source(&ctx, SaveSourceRequest {
			url: Some("https://example.com/paper".to_string()),
			citation_meta: Some(json!({ "year": 1776 })),
			snippet: Some("An inquiry.".to_string()),
			..new_source(project.id, "Paper")
		})
		.await
		.expect("Failed to save source.")
		.source;

	assert_eq!(created.project_id, project.id);
	assert_eq!(created.source_type, "web");
	assert_eq!(created.url.as_deref(), Some("https://example.com/paper"));
	assert_eq!(created.citation_meta, Some(json!({ "year": 1776 })));

	let replaced = service
		.save_source(&ctx, SaveSourceRequest {
			id: Some(created.id),
			source_type: Some(SourceType::Book),
			url: Some(String::new()),
			..new_source(project.id, "Book")
		})
		.await
		.expect("Failed to replace source.")
		.source;

	assert_eq!(replaced.id, created.id);
	assert_eq!(replaced.source_type, "book");
	assert_eq!(replaced.title, "Book");
	assert_eq!(replaced.url, None);
	assert_eq!(replaced.citation_meta, None);
	assert_eq!(replaced.snippet, None);
	assert_eq!(replaced.created_at, created.created_at);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DOSSIER_PG_DSN to run."]
async fn sources_cannot_move_or_leak_across_projects() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping sources_cannot_move_or_leak_across_projects; set DOSSIER_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let owner = super::user("user-a");
	let intruder = super::user("user-b");
	let first = super::create_project(&service, &owner, "First").await;
	let second = super::create_project(&service, &owner, "Second").await;
	let source = service
		.save_source(&owner, new_source(first.id, "Paper"))
		.await
		.expect("Failed to save source.")
		.source;
	let moved = SaveSourceRequest { id: Some(source.id), ..new_source(second.id, "Paper") };

	assert!(matches!(service.save_source(&owner, moved).await, Err(Error::NotFound { .. })));
	assert!(matches!(
		service.save_source(&intruder, new_source(first.id, "Injected")).await,
		Err(Error::NotFound { .. })
	));

	let overwrite = SaveSourceRequest { id: Some(source.id), ..new_source(first.id, "Hijacked") };

	assert!(matches!(service.save_source(&intruder, overwrite).await, Err(Error::NotFound { .. })));
	assert!(matches!(
		service
			.delete_source(&intruder, DeleteSourceRequest { id: source.id, project_id: first.id })
			.await,
		Err(Error::NotFound { .. })
	));
	assert!(matches!(
		service
			.delete_source(&owner, DeleteSourceRequest { id: source.id, project_id: second.id })
			.await,
		Err(Error::NotFound { .. })
	));

	let details = service
		.get_project_with_details(&owner, GetProjectRequest { id: first.id })
		.await
		.expect("Failed to load project.");

	assert_eq!(details.sources.len(), 1);
	assert_eq!(details.sources[0].title, "Paper");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DOSSIER_PG_DSN to run."]
async fn delete_source_detaches_notes() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping delete_source_detaches_notes; set DOSSIER_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let ctx = super::user("user-a");
	let project = super::create_project(&service, &ctx, "Essay").await;
	let source = service
		.save_source(&ctx, new_source(project.id, "Paper"))
		.await
		.expect("Failed to save source.")
		.source;
	let note = service
		.save_note(&ctx, SaveNoteRequest {
			id: None,
			project_id: project.id,
			source_id: Some(source.id),
			note_type: None,
			content: "Cited finding.".to_string(),
			heading: None,
			tags: None,
			location: None,
			ai_meta: None,
		})
		.await
		.expect("Failed to save note.")
		.note;

	assert_eq!(note.source_id, Some(source.id));

	let deleted = service
		.delete_source(&ctx, DeleteSourceRequest { id: source.id, project_id: project.id })
		.await
		.expect("Failed to delete source.")
		.source;

	assert_eq!(deleted.id, source.id);
	assert_eq!(deleted.title, "Paper");

	let details = service
		.get_project_with_details(&ctx, GetProjectRequest { id: project.id })
		.await
		.expect("Failed to load project.");

	assert!(details.sources.is_empty());
	assert_eq!(details.notes.len(), 1);
	assert_eq!(details.notes[0].source_id, None);
	assert!(matches!(
		service
			.delete_source(&ctx, DeleteSourceRequest { id: source.id, project_id: project.id })
			.await,
		Err(Error::NotFound { .. })
	));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DOSSIER_PG_DSN to run."]
async fn save_source_with_unknown_id_is_not_found() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping save_source_with_unknown_id_is_not_found; set DOSSIER_PG_DSN to run this test."
		);

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let ctx = super::user("user-a");
	let project = super::create_project(&service, &ctx, "Essay").await;
	let missing = SaveSourceRequest { id: Some(i64::MAX), ..new_source(project.id, "Ghost") };

	assert!(matches!(service.save_source(&ctx, missing).await, Err(Error::NotFound { .. })));

	let details = service
		.get_project_with_details(&ctx, GetProjectRequest { id: project.id })
		.await
		.expect("Failed to load project.");

	assert!(details.sources.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
