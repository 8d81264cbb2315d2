use anyhow::Result;
use platform_db::DbPool;
use products_hr::{EmployeeService, NewEmployee};
use tracing::info;

const SAMPLES: &[(&str, &str, &str, &str, &str)] = &[
    ("Ada", "Lovelace", "Engineer", "5550100001", "ada@example.com"),
    ("Grace", "Hopper", "Architect", "5550100002", "grace@example.com"),
    ("Alan", "Turing", "Researcher", "5550100003", "alan@example.com"),
    ("Katherine", "Johnson", "Analyst", "5550100004", "katherine@example.com"),
    ("Linus", "Torvalds", "Maintainer", "5550100005", "linus@example.com"),
];

pub fn sample_employees() -> impl Iterator<Item = NewEmployee> {
    SAMPLES.iter().map(
        |&(first_name, last_name, position, phone_number, email)| NewEmployee {
            first_name: first_name.into(),
            last_name: last_name.into(),
            position: position.into(),
            phone_number: phone_number.into(),
            email: email.into(),
        },
    )
}

pub async fn run(pool: DbPool) -> Result<()> {
    let service = EmployeeService::new(pool);
    let mut created = 0usize;
    for sample in sample_employees() {
        match service.create(sample).await {
            Ok(employee) => {
                created += 1;
                info!(id = employee.id, email = %employee.email, "seeded employee");
            }
            Err(err) if err.is_client_error() => info!(%err, "sample employee skipped"),
            Err(err) => return Err(err.into()),
        }
    }
    info!(created, "seed complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use migration::{Migrator, MigratorTrait};
    use products_hr::ListQuery;
    use sea_orm::Database;

    use super::*;

    #[tokio::test]
    async fn seeding_twice_keeps_one_copy_of_each_sample() {
        let pool = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&pool, None).await.unwrap();

        run(pool.clone()).await.unwrap();
        run(pool.clone()).await.unwrap();

        let page = EmployeeService::new(pool)
            .list(ListQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, SAMPLES.len() as u64);
    }
}
