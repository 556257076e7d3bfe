//! Objects are the buildings managed by the company.

mod db;
mod domain;
mod handlers;

pub use db::{
    create_object, create_object_table, delete_object, get_all_objects, get_object,
    object_exists, update_object,
};
pub use domain::{Object, ObjectForm};
pub use handlers::{
    ObjectState, create_object_endpoint, delete_object_endpoint, get_object_endpoint,
    list_objects_endpoint, update_object_endpoint,
};
