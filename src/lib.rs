//! # simple_cli_args
//!
//! Turn a plain function signature into a command-line argument parser.
//!
//! Parameters without a default become positional arguments, parameters with
//! a default become options (`--name value`, any unambiguous prefix of it, or
//! `-name value`), and a variadic collector absorbs whatever is left over.
//! All parsed values arrive as text; an omitted option keeps its declared
//! default untouched.
//!
//! ```no_run
//! use simple_cli_args::{CliFn, Signature};
//!
//! let main = CliFn::new(
//!     Signature::parse("/// Pick some fruit.\nfn main(arg1, arg2, defarg1 = \"def1\", *otherargs)").unwrap(),
//!     |args| {
//!         println!("{:?} {:?}", args.get("arg1"), args.rest());
//!         Ok(())
//!     },
//! );
//!
//! // No explicit values: read the command line.
//! main.run();
//! ```

pub mod argspec;
pub mod call;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod failure;
pub mod parser;
pub mod signature;

pub use argspec::ArgumentSpec;
pub use call::{Arguments, BindError, Call};
pub use config::Config;
pub use dispatch::CliFn;
pub use failure::Failure;
pub use serde_json::Value;
pub use signature::{Parameter, Signature, SignatureBuilder, SignatureError};
