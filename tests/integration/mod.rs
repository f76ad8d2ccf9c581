//! Integration tests for the blob layout validator

mod cli_contract;
mod support;
mod validator_flow;
