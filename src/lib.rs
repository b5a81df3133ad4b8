pub mod error;
pub mod embed {
    pub mod loader;
    #[cfg(feature = "hydrate")]
    pub mod web;
}

#[cfg(feature = "ssr")]
pub mod app;
#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod demo_seeder;
#[cfg(feature = "ssr")]
pub mod db {
    pub mod memory;
    pub mod models;
    pub mod project_repository;
    pub mod repository;
    pub mod share_link_repository;
}
#[cfg(feature = "ssr")]
pub mod api {
    pub mod errors;
    pub mod publish;
    pub mod share;
}
#[cfg(feature = "ssr")]
pub mod rendering {
    pub mod footer;
}
