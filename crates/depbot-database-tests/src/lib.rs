mod testcase;

#[cfg(test)]
mod branch;
#[cfg(test)]
mod issue;
#[cfg(test)]
mod monorepo_release;
#[cfg(test)]
mod pull_request;
#[cfg(test)]
mod registry_snapshot;
#[cfg(test)]
mod repository;

pub use testcase::db_test_case;
