use app_lib::app;
use app_lib::domain::NewPerson;
use app_lib::error::AppError;
use app_lib::infra::DbPool;
use serde::Serialize;

fn show<T: Serialize>(step: &str, value: &T) -> Result<(), AppError> {
    log::info!("{}: {}", step, serde_json::to_string(value)?);
    Ok(())
}

fn run(pool: &DbPool) -> Result<(), AppError> {
    let john = app::create_and_save_person(pool, NewPerson::sample())?;
    show("createAndSavePerson", &john)?;

    let people = app::create_many_people(
        pool,
        vec![
            NewPerson::new("Mary", Some(28), &["burrito", "salad"]),
            NewPerson::new("Mary", Some(51), &["soup"]),
            NewPerson::new("Ann", Some(19), &["burrito"]),
            NewPerson::new("Bob", None, &["burrito", "pizza"]),
        ],
    )?;
    show("createManyPeople", &people)?;

    show("findPeopleByName", &app::find_people_by_name(pool, "Mary")?)?;
    show("findOneByFood", &app::find_one_by_food(pool, "eggs")?)?;
    show("findPersonById", &app::find_person_by_id(pool, &john.id)?)?;
    show("findEditThenSave", &app::find_edit_then_save(pool, &john.id)?)?;
    show("findAndUpdate", &app::find_and_update(pool, "John")?)?;
    show("removeById", &app::remove_by_id(pool, &john.id)?)?;
    show("queryChain", &app::query_chain(pool)?)?;
    show("removeManyPeople", &app::remove_many_people(pool)?)?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = app_lib::open_from_env().and_then(|pool| run(&pool));
    if let Err(e) = result {
        log::error!("[{}] {}", e.code(), e);
        std::process::exit(1);
    }
}
