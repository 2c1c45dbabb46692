pub mod paths;
pub mod refresh;
pub mod run;
