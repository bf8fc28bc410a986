//! Application use cases.

mod person;

pub use person::{
    create_and_save_person, create_many_people, find_and_update, find_and_update_with,
    find_edit_then_save, find_edit_then_save_with, find_one_by_food, find_people_by_name,
    find_person_by_id, query_chain, query_chain_with, remove_by_id, remove_many_people,
    remove_many_people_named, RemoveOutcome, AGE_TO_SET, FOOD_TO_ADD, FOOD_TO_SEARCH,
    NAME_TO_REMOVE, QUERY_CHAIN_LIMIT,
};
