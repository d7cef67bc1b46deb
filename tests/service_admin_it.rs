// std
use std::sync::Arc;
// self
use idp_admin::{
	error::Error,
	policy::PasswordPolicy,
	record::{Client, Password},
	service::{AdminService, UpdateClientPatch, UpdatePasswordPatch},
	store::{AdminStore, MemoryStore},
};

fn build_admin() -> (AdminService, Arc<MemoryStore>) {
	let backend = Arc::new(MemoryStore::default());
	let service = AdminService::new(backend.clone());

	(service, backend)
}

// Relaxed bounds so test fixtures can hash at the cheap cost 4 instead of spending seconds
// per bcrypt invocation.
fn relaxed_policy() -> PasswordPolicy {
	PasswordPolicy::new(4, 4, 6).expect("Relaxed policy bounds should be consistent.")
}

#[tokio::test]
async fn create_client_fills_empty_credentials() {
	let (service, _) = build_admin();
	let response = service
		.create_client(Client { id: "c1".into(), name: "App".into(), ..Default::default() })
		.await
		.expect("Creating a client with an explicit id should succeed.");

	assert_eq!(response.client.id, "c1");
	assert!(response.client.secret.len() >= 64, "generated secret must be at least 64 chars");

	let generated_a = service
		.create_client(Client::default())
		.await
		.expect("Creating a client with a generated id should succeed.");
	let generated_b = service
		.create_client(Client::default())
		.await
		.expect("Creating a second generated client should succeed.");

	assert!(!generated_a.client.id.is_empty());
	assert_ne!(generated_a.client.id, generated_b.client.id);
	assert_ne!(generated_a.client.secret, generated_b.client.secret);
}

#[tokio::test]
async fn create_client_reports_id_collisions() {
	let (service, _) = build_admin();
	let client = Client { id: "c1".into(), ..Default::default() };

	service.create_client(client.clone()).await.expect("First create should succeed.");

	let err = service
		.create_client(client)
		.await
		.expect_err("Second create with the same id should collide.");

	assert!(matches!(err, Error::AlreadyExists { .. }));
}

#[tokio::test]
async fn update_client_is_sparse() {
	let (service, backend) = build_admin();

	service
		.create_client(Client {
			id: "c1".into(),
			name: "App".into(),
			logo_url: "https://example.com/logo.png".into(),
			..Default::default()
		})
		.await
		.expect("Creating the client fixture should succeed.");

	service
		.update_client(UpdateClientPatch {
			id: "c1".into(),
			redirect_uris: Some(vec!["https://a".into()]),
			..Default::default()
		})
		.await
		.expect("Sparse update should succeed.");

	let updated = backend.client("c1").expect("Updated client should remain present.");

	assert_eq!(updated.redirect_uris, vec!["https://a".to_string()]);
	assert_eq!(updated.name, "App", "fields absent from the patch must stay untouched");
	assert_eq!(updated.logo_url, "https://example.com/logo.png");

	let before = backend.client("c1").expect("Client should be present before the no-op patch.");

	service
		.update_client(UpdateClientPatch { id: "c1".into(), ..Default::default() })
		.await
		.expect("All-empty patch should still succeed.");

	let after = backend.client("c1").expect("Client should be present after the no-op patch.");

	assert_eq!(before, after, "an all-empty patch must leave the record unchanged");
}

#[tokio::test]
async fn update_and_delete_validate_their_targets() {
	let (service, _) = build_admin();

	assert!(matches!(
		service.update_client(UpdateClientPatch::default()).await,
		Err(Error::InvalidArgument { .. })
	));
	assert!(matches!(
		service.update_client(UpdateClientPatch { id: "ghost".into(), ..Default::default() }).await,
		Err(Error::NotFound { .. })
	));

	service
		.create_client(Client { id: "c1".into(), ..Default::default() })
		.await
		.expect("Creating the client fixture should succeed.");
	service.delete_client("c1").await.expect("First delete should succeed.");

	let err = service.delete_client("c1").await.expect_err("Second delete should miss.");

	assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn password_lifecycle_with_verification() {
	let (service, _) = build_admin();
	let service = service.with_policy(relaxed_policy());
	let hash = bcrypt::hash("correct horse", 4).expect("Hashing the fixture should succeed.");

	service
		.create_password(Password {
			email: "admin@example.com".into(),
			username: "admin".into(),
			user_id: "user-1".into(),
			hash: hash.into_bytes(),
		})
		.await
		.expect("Creating the password fixture should succeed.");

	assert!(
		service
			.verify_password("admin@example.com", "correct horse")
			.await
			.expect("Verification of the right password should succeed.")
	);
	assert!(
		!service
			.verify_password("admin@example.com", "battery staple")
			.await
			.expect("A wrong password is a normal false response, not an error."),
	);

	let err = service
		.verify_password("ghost@example.com", "anything")
		.await
		.expect_err("Verification against an unknown email should miss.");

	assert!(matches!(err, Error::NotFound { .. }));

	let new_hash = bcrypt::hash("battery staple", 4).expect("Rehashing should succeed.");

	service
		.update_password(UpdatePasswordPatch {
			email: "admin@example.com".into(),
			new_hash: Some(new_hash.into_bytes()),
			new_username: Some("root".into()),
		})
		.await
		.expect("Updating hash and username should succeed.");

	assert!(
		service
			.verify_password("admin@example.com", "battery staple")
			.await
			.expect("Verification after rotation should succeed.")
	);

	let listed = service.list_passwords().await.expect("Listing passwords should succeed.");

	assert_eq!(listed.len(), 1);
	assert_eq!(listed[0].email, "admin@example.com");
	assert_eq!(listed[0].username, "root");
	assert_eq!(listed[0].user_id, "user-1");

	service
		.delete_password("admin@example.com")
		.await
		.expect("Deleting the credential should succeed.");

	let err = service
		.delete_password("admin@example.com")
		.await
		.expect_err("Second delete should miss.");

	assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn password_inputs_are_validated_before_storage() {
	let (service, backend) = build_admin();

	assert!(matches!(
		service
			.create_password(Password {
				email: "a@b.c".into(),
				hash: b"$2b$12$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy".to_vec(),
				..Default::default()
			})
			.await,
		Err(Error::InvalidArgument { .. })
	));
	assert!(matches!(
		service
			.create_password(Password {
				email: "a@b.c".into(),
				user_id: "user-1".into(),
				..Default::default()
			})
			.await,
		Err(Error::InvalidArgument { .. })
	));

	// Cost 4 is below the default policy's minimum; the facade must reject it up front.
	let cheap_hash = bcrypt::hash("pw", 4).expect("Hashing at cost 4 should succeed.");

	assert!(matches!(
		service
			.create_password(Password {
				email: "a@b.c".into(),
				user_id: "user-1".into(),
				hash: cheap_hash.into_bytes(),
				..Default::default()
			})
			.await,
		Err(Error::InvalidArgument { .. })
	));
	assert!(matches!(
		service
			.update_password(UpdatePasswordPatch { email: "a@b.c".into(), ..Default::default() })
			.await,
		Err(Error::InvalidArgument { .. })
	));
	assert!(
		backend.list_passwords().await.expect("Listing should succeed.").is_empty(),
		"validation failures must never reach storage"
	);
}

#[tokio::test]
async fn version_is_reported() {
	let (service, _) = build_admin();
	let version = service.version();

	assert!(!version.server.is_empty());
	assert!(!version.api.is_empty());
}
