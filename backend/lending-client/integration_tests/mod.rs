mod classification;
mod helpers;
mod refresh;
mod scenarios;
mod services;
