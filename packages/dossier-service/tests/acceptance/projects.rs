use dossier_service::{
	ArchiveProjectRequest, CreateProjectRequest, Error, GetProjectRequest, ListProjectsRequest,
	SaveNoteRequest, SaveSourceRequest, UpdateProjectRequest,
};

fn empty_update(id: i64) -> UpdateProjectRequest {
	UpdateProjectRequest { id, title: None, description: None, topic: None, tags: None, status: None }
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DOSSIER_PG_DSN to run."]
async fn archived_projects_are_listed_only_on_request() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping archived_projects_are_listed_only_on_request; set DOSSIER_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let ctx = super::user("user-a");
	let essay = super::create_project(&service, &ctx, "Essay").await;

	assert_eq!(essay.status, "active");
	assert_eq!(essay.owner_id, "user-a");
	assert_eq!(essay.created_at, essay.updated_at);

	let archived = service
		.archive_project(&ctx, ArchiveProjectRequest { id: essay.id })
		.await
		.expect("Failed to archive project.")
		.project;

	assert_eq!(archived.status, "archived");
	assert!(archived.updated_at >= essay.updated_at);

	let active = service
		.list_projects(&ctx, ListProjectsRequest::default())
		.await
		.expect("Failed to list projects.");

	assert!(active.projects.iter().all(|project| project.id != essay.id));

	let all = service
		.list_projects(&ctx, ListProjectsRequest { include_archived: true })
		.await
		.expect("Failed to list projects.");

	assert!(all.projects.iter().any(|project| project.id == essay.id));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DOSSIER_PG_DSN to run."]
async fn projects_are_listed_most_recently_updated_first() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping projects_are_listed_most_recently_updated_first; set DOSSIER_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let ctx = super::user("user-a");
	let first = super::create_project(&service, &ctx, "First").await;
	let second = super::create_project(&service, &ctx, "Second").await;
	let touched = UpdateProjectRequest { topic: Some("history".to_string()), ..empty_update(first.id) };

	service.update_project(&ctx, touched).await.expect("Failed to update project.");

	let listed = service
		.list_projects(&ctx, ListProjectsRequest::default())
		.await
		.expect("Failed to list projects.");
	let ids: Vec<i64> = listed.projects.iter().map(|project| project.id).collect();

	assert_eq!(ids, vec![first.id, second.id]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DOSSIER_PG_DSN to run."]
async fn update_changes_only_supplied_fields() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping update_changes_only_supplied_fields; set DOSSIER_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let ctx = super::user("user-a");
	let created = service
		.create_project(&ctx, CreateProjectRequest {
			title: "Thesis".to_string(),
			description: Some("Working draft.".to_string()),
			topic: Some("economics".to_string()),
			tags: Some(vec![" labor ".to_string(), "wages".to_string()]),
			status: None,
		})
		.await
		.expect("Failed to create project.")
		.project;

	assert_eq!(created.tags, Some(vec!["labor".to_string(), "wages".to_string()]));

	let unchanged = service
		.update_project(&ctx, empty_update(created.id))
		.await
		.expect("Failed to apply empty update.")
		.project;

	assert_eq!(unchanged.updated_at, created.updated_at);
	assert_eq!(unchanged.title, "Thesis");

	let renamed = service
		.update_project(&ctx, UpdateProjectRequest {
			title: Some("Dissertation".to_string()),
			..empty_update(created.id)
		})
		.await
		.expect("Failed to update project.")
		.project;

	assert_eq!(renamed.title, "Dissertation");
	assert_eq!(renamed.description, created.description);
	assert_eq!(renamed.topic, created.topic);
	assert_eq!(renamed.tags, created.tags);
	assert_eq!(renamed.status, "active");
	assert_eq!(renamed.created_at, created.created_at);
	assert!(renamed.updated_at >= created.updated_at);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DOSSIER_PG_DSN to run."]
async fn other_owners_see_not_found() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping other_owners_see_not_found; set DOSSIER_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let owner = super::user("user-a");
	let intruder = super::user("user-b");
	let project = super::create_project(&service, &owner, "Private").await;
	let rename = UpdateProjectRequest { title: Some("Stolen".to_string()), ..empty_update(project.id) };

	assert!(matches!(
		service.update_project(&intruder, rename).await,
		Err(Error::NotFound { .. })
	));
	assert!(matches!(
		service.update_project(&intruder, empty_update(project.id)).await,
		Err(Error::NotFound { .. })
	));
	assert!(matches!(
		service.archive_project(&intruder, ArchiveProjectRequest { id: project.id }).await,
		Err(Error::NotFound { .. })
	));
	assert!(matches!(
		service.get_project_with_details(&intruder, GetProjectRequest { id: project.id }).await,
		Err(Error::NotFound { .. })
	));

	let listed = service
		.list_projects(&intruder, ListProjectsRequest { include_archived: true })
		.await
		.expect("Failed to list projects.");

	assert!(listed.projects.is_empty());

	let details = service
		.get_project_with_details(&owner, GetProjectRequest { id: project.id })
		.await
		.expect("Failed to load project.");

	assert_eq!(details.project.title, "Private");
	assert_eq!(details.project.status, "active");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DOSSIER_PG_DSN to run."]
async fn details_include_sources_and_notes() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping details_include_sources_and_notes; set DOSSIER_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let ctx = super::user("user-a");
	let project = super::create_project(&service, &ctx, "Reading list").await;
	let other = super::create_project(&service, &ctx, "Elsewhere").await;
	let source = service
		.save_source(&ctx, SaveSourceRequest {
			id: None,
			project_id: project.id,
			source_type: None,
			title: "The Wealth of Nations".to_string(),
			url: None,
			citation_text: None,
			citation_meta: None,
			snippet: None,
			metadata: None,
		})
		.await
		.expect("Failed to save source.")
		.source;

	for (project_id, content) in [(project.id, "First note."), (other.id, "Unrelated note.")] {
		service
			.save_note(&ctx, SaveNoteRequest {
				id: None,
				project_id,
				source_id: None,
				note_type: None,
				content: content.to_string(),
				heading: None,
				tags: None,
				location: None,
				ai_meta: None,
			})
			.await
			.expect("Failed to save note.");
	}

	let details = service
		.get_project_with_details(&ctx, GetProjectRequest { id: project.id })
		.await
		.expect("Failed to load project.");

	assert_eq!(details.project.id, project.id);
	assert_eq!(details.sources.len(), 1);
	assert_eq!(details.sources[0].id, source.id);
	assert_eq!(details.notes.len(), 1);
	assert_eq!(details.notes[0].content, "First note.");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
