pub mod ned;
pub mod prelude;
pub mod track;
pub mod track_id;
pub mod trajectory;
