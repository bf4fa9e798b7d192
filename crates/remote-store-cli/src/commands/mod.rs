pub(crate) mod app_config;
