use couchlayer::{
    memory::{InMemoryServer, LoggedRequest},
    prelude::*,
};

async fn people() -> (RecordStore, InMemoryServer) {
    let server = InMemoryServer::builder().database("people").build().await.unwrap();

    let mut registry = SchemaRegistry::new();
    registry
        .register(
            RecordType::builder("Person")
                .has("name", AttributeOptions::new().of_type(AttributeType::Text))
                .has("age", AttributeOptions::new().of_type(AttributeType::Number))
                .build()
                .unwrap(),
        )
        .unwrap()
        .register(
            RecordType::builder("Student")
                .extends("Person")
                .has("school", AttributeOptions::new().of_type(AttributeType::Text))
                .build()
                .unwrap(),
        )
        .unwrap()
        .connect("Person", server.clone());

    (RecordStore::new(registry), server)
}

#[tokio::test]
async fn records_round_trip_through_the_server() {
    let (store, server) = people().await;
    let people = store.collection("Person").unwrap();

    let mut person = people.create(json!({"name": "McLovin", "age": 17})).await.unwrap();
    assert!(!person.is_new());
    let id = person.id().unwrap();
    assert!(person.rev().unwrap().starts_with("1-"));

    let stored = server.document("people", &id).await.unwrap();
    assert_eq!(stored["name"], json!("McLovin"));
    assert_eq!(stored["_id"], json!(id));

    let found = people.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(found.get("name"), Some(&json!("McLovin")));
    assert_eq!(found.get_as::<u32>("age").unwrap(), Some(17));

    person.set("age", 18);
    assert!(people.save(&mut person).await.unwrap());
    assert_eq!(person.id(), Some(id.clone()));
    assert!(person.rev().unwrap().starts_with("2-"));

    assert!(people.delete(&mut person).await.unwrap());
    assert!(person.is_new());
    assert!(people.find_by_id(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn saving_with_an_id_puts_the_document() {
    let (store, server) = people().await;
    let people = store.collection("Person").unwrap();

    let mut person = people.build(json!({"name": "Seth"}).as_object().unwrap()).unwrap();
    person.set_id("seth");
    assert!(store.save(&mut person).await.unwrap());

    let requests = server.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].path, "/people/seth");
    assert!(server.document("people", "seth").await.is_some());
}

#[tokio::test]
async fn views_find_and_count_records() {
    let (store, server) = people().await;
    let people = store.collection("Person").unwrap();

    for (name, age) in [("McLovin", 17), ("Seth", 17), ("McLovin", 25)] {
        people.create(json!({"name": name, "age": age})).await.unwrap();
    }
    server.clear_requests().await;

    let by_name = FindOptions::builder().by("name", "McLovin").build();
    assert_eq!(people.count(&by_name).await.unwrap(), 2);
    let by_age = FindOptions::builder().by("age", 17).build();
    assert_eq!(people.find_all(&by_age).await.unwrap().len(), 2);

    let first = people
        .find(Scope::First, &FindOptions::builder().by("name", "Seth").build())
        .await
        .unwrap()
        .into_first()
        .unwrap();
    assert_eq!(first.get("name"), Some(&json!("Seth")));

    assert_eq!(
        server.requests().await[0],
        LoggedRequest {
            method: "GET".to_string(),
            path: "/people/_view/by_name/by_name?key=McLovin".to_string(),
            body: None,
        }
    );
}

#[tokio::test]
async fn finding_without_a_filter_is_an_argument_error() {
    let (store, _server) = people().await;
    let people = store.collection("Person").unwrap();

    let err = people.find(Scope::All, &FindOptions::new()).await.unwrap_err();
    assert!(matches!(err, DocumentStoreError::Argument(_)));
}

#[tokio::test]
async fn subtypes_share_the_parent_database_and_connection() {
    let (store, server) = people().await;
    let students = store.collection("Student").unwrap();
    assert_eq!(students.database_name(), "people");

    let student = students
        .create(json!({"name": "Evan", "school": "Clark"}))
        .await
        .unwrap();
    let stored = server.document("people", &student.id().unwrap()).await.unwrap();
    assert_eq!(stored["school"], json!("Clark"));
}

#[tokio::test]
async fn rejected_saves_report_false() {
    let server = InMemoryServer::new();
    let mut registry = SchemaRegistry::new();
    registry
        .register(RecordType::new("Person"))
        .unwrap()
        .connect("Person", server.clone());
    let store = RecordStore::new(registry);
    let people = store.collection("Person").unwrap();

    let person = people.create(json!({})).await.unwrap();
    assert!(person.is_new());
    assert!(person.id().is_none());
}

#[tokio::test]
async fn deleting_new_records_needs_a_revision() {
    let (store, _server) = people().await;
    let people = store.collection("Person").unwrap();

    let mut person = people.build(&Default::default()).unwrap();
    person.set_id("mclovin");
    let err = people.delete(&mut person).await.unwrap_err();
    assert_eq!(err.to_string(), "You must specify a revision");
}

#[tokio::test]
async fn stale_revisions_are_not_deleted() {
    let (store, server) = people().await;
    let people = store.collection("Person").unwrap();

    let person = people.create(json!({"name": "Seth"})).await.unwrap();
    let id = person.id().unwrap();

    assert!(!people.delete_by_id(Some(&id), Some("1-stale")).await.unwrap());
    assert!(server.document("people", &id).await.is_some());

    assert!(people.delete_by_id(Some(&id), person.rev().as_deref()).await.unwrap());
    assert!(server.document("people", &id).await.is_none());
}

#[tokio::test]
async fn nested_records_are_stored_inside_their_owner() {
    let server = InMemoryServer::builder().database("invoices").build().await.unwrap();
    let mut registry = SchemaRegistry::new();
    registry
        .register(
            RecordType::builder("Invoice")
                .has("number", AttributeOptions::new().of_type(AttributeType::Text))
                .has_many("lineitems", AssociationOptions::new())
                .build()
                .unwrap(),
        )
        .unwrap()
        .register(
            RecordType::builder("Invoice::Lineitem")
                .has("price", AttributeOptions::new().of_type(AttributeType::Decimal))
                .build()
                .unwrap(),
        )
        .unwrap()
        .connect("Invoice", server.clone());
    assert_eq!(registry.database_name("Invoice::Lineitem").unwrap(), "invoice_lineitems");

    let store = RecordStore::new(registry);
    let invoices = store.collection("Invoice").unwrap();
    let invoice = invoices
        .create(json!({
            "number": "2024-001",
            "lineitems": [{"price": 10.5}, {"price": 4.5}],
        }))
        .await
        .unwrap();

    let found = invoices.find_by_id(&invoice.id().unwrap()).await.unwrap().unwrap();
    let prices = found
        .children("lineitems")
        .iter()
        .map(|item| item.get_as::<f64>("price").unwrap().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(prices, vec![10.5, 4.5]);
    assert_eq!(found.children("lineitems")[0].type_name(), "Invoice::Lineitem");
}

#[tokio::test]
async fn migrator_creates_and_deletes_databases() {
    let server = InMemoryServer::new();
    let migrator = Migrator::new(server.clone());

    assert!(migrator.create_database("people").await.unwrap());
    assert_eq!(server.database_names().await, vec!["people".to_string()]);
    assert!(matches!(
        migrator.create_database("people").await.unwrap_err(),
        DocumentStoreError::Migration(MigrationError::DatabaseExists(_))
    ));

    assert!(migrator.delete_database("people").await.unwrap());
    assert!(matches!(
        migrator.delete_database("people").await.unwrap_err(),
        DocumentStoreError::Migration(MigrationError::DatabaseMissing(_))
    ));
}
