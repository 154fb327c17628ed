//! # echo_args
//!
//! Small demo of `simple_cli_args`: lists the fruits given on the command line.
//!
//! ## Usage
//!
//! - `echo_args apple banana`
//! - `echo_args apple banana --cucumber pickled kiwi lime`
//! - `echo_args --help`
//!
//! Set `RUST_LOG=debug` to trace how the arguments are mapped.

use simple_cli_args::{CliFn, Signature, fail};

const MODULE_DOC: &str = "Lists the fruits given on the command line.";

/// Print an error message and exit with code 1.
fn fatal_error(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

/// Entry point for the demo.
fn main() {
    env_logger::init();

    let signature = Signature::parse(
        r#"
        /// Every argument arrives as text; an omitted cucumber stays "green".
        fn main(apple, banana, cucumber = "green", *others)
        "#,
    )
    .unwrap_or_else(|e| fatal_error(&e.to_string()));

    let main = CliFn::new(signature, |args| {
        let cucumber = args.get_str("cucumber").unwrap_or_default();
        if cucumber.is_empty() {
            fail!("cucumber must not be empty");
        }
        println!(
            "Our fruits are: {} {} {} | {}",
            args.get_str("apple").unwrap_or_default(),
            args.get_str("banana").unwrap_or_default(),
            cucumber,
            args.rest_strs().join(", ")
        );
        Ok(())
    })
    .module_doc(MODULE_DOC);

    main.run();
}
