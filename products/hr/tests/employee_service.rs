use anyhow::Result;
use entity::employees;
use migration::{Migrator, MigratorTrait};
use products_hr::{
    EmployeeError, EmployeePatch, EmployeeService, ListQuery, NewEmployee, SortDirection,
};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait, Set};

async fn setup() -> Result<(DatabaseConnection, EmployeeService)> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    let service = EmployeeService::new(db.clone());
    Ok((db, service))
}

fn employee(n: u32) -> NewEmployee {
    NewEmployee {
        first_name: format!("E{n:02}"),
        last_name: "Smith".into(),
        position: "Engineer".into(),
        phone_number: format!("555000{n:04}"),
        email: format!("e{n}@example.com"),
    }
}

async fn row_count(db: &DatabaseConnection) -> Result<u64> {
    Ok(employees::Entity::find().count(db).await?)
}

#[tokio::test]
async fn create_assigns_id_and_keeps_fields() -> Result<()> {
    let (_db, service) = setup().await?;
    let input = employee(1);
    let created = service.create(input.clone()).await?;
    assert!(created.id > 0);
    assert_eq!(created.first_name, input.first_name);
    assert_eq!(created.email, input.email);

    let fetched = service.get(created.id).await?;
    assert_eq!(fetched, created);
    Ok(())
}

#[tokio::test]
async fn create_rejects_duplicate_email() -> Result<()> {
    let (db, service) = setup().await?;
    service.create(employee(1)).await?;

    let mut clash = employee(2);
    clash.email = "e1@example.com".into();
    let err = service.create(clash).await.unwrap_err();
    assert!(matches!(err, EmployeeError::DuplicateEmail));
    assert_eq!(row_count(&db).await?, 1);
    Ok(())
}

#[tokio::test]
async fn create_rejects_duplicate_phone_number() -> Result<()> {
    let (db, service) = setup().await?;
    service.create(employee(1)).await?;

    let mut clash = employee(2);
    clash.phone_number = employee(1).phone_number;
    let err = service.create(clash).await.unwrap_err();
    assert!(matches!(err, EmployeeError::DuplicatePhoneNumber));
    assert_eq!(row_count(&db).await?, 1);
    Ok(())
}

#[tokio::test]
async fn email_conflict_is_reported_before_phone_conflict() -> Result<()> {
    let (_db, service) = setup().await?;
    service.create(employee(1)).await?;
    let err = service.create(employee(1)).await.unwrap_err();
    assert!(matches!(err, EmployeeError::DuplicateEmail));
    Ok(())
}

#[tokio::test]
async fn unique_index_violations_map_to_duplicate_errors() -> Result<()> {
    let (db, service) = setup().await?;
    let existing = service.create(employee(1)).await?;

    // Bypass the service checks to hit the index directly, as a racing writer would.
    let err = employees::ActiveModel {
        first_name: Set("Race".into()),
        last_name: Set("Condition".into()),
        position: Set("Tester".into()),
        phone_number: Set(existing.phone_number.clone()),
        email: Set("race@example.com".into()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap_err();
    assert!(matches!(
        EmployeeError::from(err),
        EmployeeError::DuplicatePhoneNumber
    ));
    Ok(())
}

#[tokio::test]
async fn update_unknown_id_is_not_found() -> Result<()> {
    let (db, service) = setup().await?;
    let created = service.create(employee(1)).await?;

    let patch = EmployeePatch {
        first_name: Some("Ghost".into()),
        ..EmployeePatch::default()
    };
    let err = service.update(created.id + 100, patch).await.unwrap_err();
    assert!(matches!(err, EmployeeError::NotFound(id) if id == created.id + 100));
    assert_eq!(err.to_string(), format!("Employee with ID {} not found", created.id + 100));

    let untouched = service.get(created.id).await?;
    assert_eq!(untouched, created);
    assert_eq!(row_count(&db).await?, 1);
    Ok(())
}

#[tokio::test]
async fn update_merges_present_fields_only() -> Result<()> {
    let (_db, service) = setup().await?;
    let created = service.create(employee(1)).await?;

    let patch = EmployeePatch {
        first_name: Some(String::new()),
        email: Some("fresh@example.com".into()),
        ..EmployeePatch::default()
    };
    let updated = service.update(created.id, patch).await?;
    assert_eq!(updated.email, "fresh@example.com");
    assert_eq!(updated.first_name, created.first_name);
    assert_eq!(updated.last_name, created.last_name);
    assert_eq!(updated.position, created.position);
    assert_eq!(updated.phone_number, created.phone_number);
    assert_eq!(service.get(created.id).await?, updated);
    Ok(())
}

#[tokio::test]
async fn empty_patch_returns_the_row_unchanged() -> Result<()> {
    let (_db, service) = setup().await?;
    let created = service.create(employee(1)).await?;
    let updated = service.update(created.id, EmployeePatch::default()).await?;
    assert_eq!(updated, created);
    Ok(())
}

#[tokio::test]
async fn update_rejects_email_of_another_row_but_not_its_own() -> Result<()> {
    let (_db, service) = setup().await?;
    let first = service.create(employee(1)).await?;
    let second = service.create(employee(2)).await?;

    let steal = EmployeePatch {
        email: Some(first.email.clone()),
        ..EmployeePatch::default()
    };
    let err = service.update(second.id, steal).await.unwrap_err();
    assert!(matches!(err, EmployeeError::DuplicateEmail));
    assert_eq!(service.get(second.id).await?, second);

    let keep = EmployeePatch {
        email: Some(second.email.clone()),
        position: Some("Lead".into()),
        ..EmployeePatch::default()
    };
    let updated = service.update(second.id, keep).await?;
    assert_eq!(updated.email, second.email);
    assert_eq!(updated.position, "Lead");
    Ok(())
}

#[tokio::test]
async fn update_rejects_phone_number_of_another_row() -> Result<()> {
    let (_db, service) = setup().await?;
    let first = service.create(employee(1)).await?;
    let second = service.create(employee(2)).await?;

    let patch = EmployeePatch {
        phone_number: Some(first.phone_number),
        ..EmployeePatch::default()
    };
    let err = service.update(second.id, patch).await.unwrap_err();
    assert!(matches!(err, EmployeeError::DuplicatePhoneNumber));
    Ok(())
}

#[tokio::test]
async fn delete_removes_row_and_returns_prior_data() -> Result<()> {
    let (db, service) = setup().await?;
    let created = service.create(employee(1)).await?;

    let deleted = service.delete(created.id).await?;
    assert_eq!(deleted, created);
    assert!(matches!(
        service.get(created.id).await,
        Err(EmployeeError::NotFound(_))
    ));
    assert_eq!(row_count(&db).await?, 0);

    assert!(matches!(
        service.delete(created.id).await,
        Err(EmployeeError::NotFound(_))
    ));
    Ok(())
}

#[tokio::test]
async fn list_paginates_with_offset_and_limit() -> Result<()> {
    let (_db, service) = setup().await?;
    for n in 1..=25 {
        service.create(employee(n)).await?;
    }

    let page = service
        .list(ListQuery {
            first_name: Some(SortDirection::Asc),
            page: 2,
            size: 10,
            ..ListQuery::default()
        })
        .await?;
    assert_eq!(page.current_page, 2);
    assert_eq!(page.total_items, 25);
    assert_eq!(page.total_pages, 3);
    let names: Vec<_> = page.data.iter().map(|e| e.first_name.as_str()).collect();
    let expected: Vec<String> = (11..=20).map(|n| format!("E{n:02}")).collect();
    assert_eq!(names, expected);

    let last = service
        .list(ListQuery {
            page: 3,
            ..ListQuery::default()
        })
        .await?;
    assert_eq!(last.data.len(), 5);

    let beyond = service
        .list(ListQuery {
            page: 4,
            ..ListQuery::default()
        })
        .await?;
    assert!(beyond.data.is_empty());
    assert_eq!(beyond.total_items, 25);
    Ok(())
}

#[tokio::test]
async fn list_applies_sort_keys_in_priority_order() -> Result<()> {
    let (_db, service) = setup().await?;
    let rows = [
        ("Bob", "Mills", "Dev"),
        ("Ann", "Zeta", "Dev"),
        ("Ann", "Alpha", "Ops"),
        ("Ann", "Quinn", "Qa"),
    ];
    for (n, (first, last, position)) in rows.into_iter().enumerate() {
        let mut input = employee(n as u32 + 1);
        input.first_name = first.into();
        input.last_name = last.into();
        input.position = position.into();
        service.create(input).await?;
    }

    let page = service
        .list(ListQuery {
            first_name: Some(SortDirection::Asc),
            position: Some(SortDirection::Desc),
            ..ListQuery::default()
        })
        .await?;
    let order: Vec<_> = page
        .data
        .iter()
        .map(|e| (e.first_name.as_str(), e.position.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![("Ann", "Qa"), ("Ann", "Ops"), ("Ann", "Dev"), ("Bob", "Dev")]
    );
    assert_eq!(page.total_pages, 1);
    Ok(())
}

#[tokio::test]
async fn list_rejects_zero_size() -> Result<()> {
    let (_db, service) = setup().await?;
    let err = service
        .list(ListQuery {
            size: 0,
            ..ListQuery::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EmployeeError::InvalidPagination(_)));
    Ok(())
}
