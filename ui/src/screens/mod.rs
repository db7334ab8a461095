// One screen per projected portal view.

pub mod connect;
pub mod gallery;
pub mod initialize;
