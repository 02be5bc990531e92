pub mod account {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod repository_mem;
    pub mod handle;
    pub mod service;
    pub mod route;
}

pub mod relationship {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod repository_mem;
    pub mod cache;
    pub mod linker;
    pub mod handle;
    pub mod service;
    pub mod route;
}
