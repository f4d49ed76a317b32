pub mod cache_cleanup;
