//! The wrapped callable.
//!
//! [`CliFn`] keeps a callable directly callable from code while also letting a
//! blank invocation read its arguments from the command line.

use crate::argspec::{ArgumentSpec, compose_help};
use crate::call::{Arguments, Call};
use crate::config::Config;
use crate::engine::Engine;
use crate::failure::{self, Failure};
use crate::signature::Signature;
use colored::Colorize;
use serde_json::Value;
use std::io::Write;

/// A callable wrapped with a command-line parser built from its signature.
///
/// ```no_run
/// use simple_cli_args::{CliFn, Signature};
///
/// let signature = Signature::parse("fn main(x, y, z = 8)").unwrap();
/// let main = CliFn::new(signature, |args| {
///     println!("{:?} {:?} {:?}", args.get("x"), args.get("y"), args.get("z"));
///     Ok(())
/// });
///
/// // Parses the process arguments, e.g. `my_tool "a" "b" --z "c"`.
/// main.run();
/// ```
pub struct CliFn<F> {
    signature: Signature,
    module_doc: Option<String>,
    help: String,
    engine: Engine,
    config: Config,
    func: F,
}

impl<F> CliFn<F> {
    pub fn new<R>(signature: Signature, func: F) -> Self
    where
        F: Fn(&Arguments) -> Result<R, Failure>,
    {
        let (help, engine) = build(&signature, None);
        Self {
            signature,
            module_doc: None,
            help,
            engine,
            config: Config::from_env(),
            func,
        }
    }

    /// Documentation of the unit that defines the callable; shown before the
    /// callable's own documentation in help output.
    #[must_use]
    pub fn module_doc(mut self, doc: impl Into<String>) -> Self {
        self.module_doc = Some(doc.into());
        let (help, engine) = build(&self.signature, self.module_doc.as_deref());
        self.help = help;
        self.engine = engine;
        self
    }

    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        self.signature.name()
    }

    pub fn doc(&self) -> Option<&str> {
        self.signature.doc()
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn argument_spec(&self) -> &ArgumentSpec {
        self.engine.spec()
    }

    /// Composed description shown at the top of the help output.
    pub fn help_text(&self) -> &str {
        &self.help
    }

    /// Full help output, as `--help` prints it.
    pub fn render_help(&self) -> String {
        self.engine.render_help()
    }
}

fn build(signature: &Signature, module_doc: Option<&str>) -> (String, Engine) {
    let help = compose_help(module_doc, signature.doc());
    let engine = Engine::new(
        signature.name(),
        &help,
        ArgumentSpec::from_signature(signature),
    );
    (help, engine)
}

impl<F, R> CliFn<F>
where
    F: Fn(&Arguments) -> Result<R, Failure>,
{
    /// Call the wrapped callable with explicit values. Nothing is parsed and
    /// nothing is caught.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the values do not bind to the signature, or whatever
    /// the callable itself returns.
    pub fn call(&self, call: Call) -> Result<R, Failure> {
        let arguments = Arguments::bind(&self.signature, call)?;
        (self.func)(&arguments)
    }

    /// Call with explicit values when there are any, otherwise parse the
    /// live command line like [`CliFn::run`].
    ///
    /// # Errors
    ///
    /// Returns `Err` only for a non-empty call, see [`CliFn::call`].
    pub fn invoke(&self, call: Call) -> Result<Option<R>, Failure> {
        if call.is_empty() {
            Ok(self.run())
        } else {
            self.call(call).map(Some)
        }
    }

    /// Parse the process arguments and call the wrapped callable.
    ///
    /// Help requests and usage errors exit the process. A failure of the
    /// callable is reported on stderr and yields `None`.
    pub fn run(&self) -> Option<R> {
        let mut args = std::env::args_os();
        let argv0 = args.next();
        let tokens: Vec<String> = args.map(|a| a.to_string_lossy().into_owned()).collect();
        let program = self.config.resolve_program(argv0.as_deref(), self.name());
        self.dispatch(Some(&program), &tokens, &mut std::io::stderr())
            .unwrap_or_else(|err| err.exit())
    }

    /// Like [`CliFn::run`], with explicit tokens and error sink.
    pub fn run_from(&self, tokens: &[String], sink: &mut impl Write) -> Option<R> {
        self.try_run_from(tokens, sink)
            .unwrap_or_else(|err| err.exit())
    }

    /// Like [`CliFn::run_from`], returning the parsing engine's error instead
    /// of exiting.
    ///
    /// # Errors
    ///
    /// Returns the engine's error for help requests, missing positionals,
    /// ambiguous abbreviations and unrecognized arguments.
    pub fn try_run_from(
        &self,
        tokens: &[String],
        sink: &mut impl Write,
    ) -> Result<Option<R>, clap::Error> {
        self.dispatch(self.config.program_name.as_deref(), tokens, sink)
    }

    fn dispatch(
        &self,
        program: Option<&str>,
        tokens: &[String],
        sink: &mut dyn Write,
    ) -> Result<Option<R>, clap::Error> {
        let call = if self.signature.variadic().is_some() {
            let parsed = self.engine.parse_tolerant(program, tokens)?;
            let mut args: Vec<Value> = parsed.named.into_iter().map(|(_, v)| v).collect();
            args.extend(
                parsed
                    .variadic
                    .into_iter()
                    .chain(parsed.unrecognized)
                    .map(Value::String),
            );
            Call {
                args,
                kwargs: Vec::new(),
            }
        } else {
            let parsed = self.engine.parse(program, tokens)?;
            Call {
                args: Vec::new(),
                kwargs: parsed.named,
            }
        };
        log::debug!(
            "{}(): dispatching {} positional and {} keyword values",
            self.name(),
            call.args.len(),
            call.kwargs.len()
        );

        match failure::catch(|| self.call(call)) {
            Ok(result) => Ok(Some(result)),
            Err(failure) => {
                log::debug!("{}() failed: {failure:?}", self.name());
                self.report(&failure, sink);
                Ok(None)
            }
        }
    }

    fn report(&self, failure: &Failure, sink: &mut dyn Write) {
        let separator = self.config.separator_line();
        let line = format!(
            "ERROR in {}, at line {}: {}",
            failure.file(),
            failure.line(),
            failure.message()
        );
        let written = if self.config.color {
            writeln!(sink, "{}\n{}", separator.red(), line.red().bold())
        } else {
            writeln!(sink, "{separator}\n{line}")
        };
        if let Err(err) = written {
            log::warn!("could not report failure of {}(): {err}", self.name());
        }
    }
}
