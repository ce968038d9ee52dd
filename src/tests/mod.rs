// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

pub(crate) mod name;

/// Routes `tracing` events (via their `log` records) to the test output.
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
