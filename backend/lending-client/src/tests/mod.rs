mod classifier;
mod config;
mod notifier;
mod request_id;
mod storage;
