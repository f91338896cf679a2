mod models;
mod redacted_token;
