pub mod cache;
pub mod ignore_filter;
pub mod tmdb;
pub mod watcher;
