//! Enforcement pack: Custom lints for vault-notify invariants.
//!
//! ## Implemented Lints
//!
//! - `NO_PRINTLN`: Forbids println!, eprintln!, and dbg! macros so that all
//!   output goes through `tracing` (directly or via `BatchLog`) and raw
//!   payload bodies never reach stdout with their identity claims.
//! - `NO_UNWRAP`: Forbids `.unwrap()` and `.expect(..)` outside test code, so
//!   one odd payload becomes a `DecodeFailure` instead of aborting the batch.

#![feature(rustc_private)]
#![warn(unused_extern_crates)]

extern crate rustc_ast;
extern crate rustc_lint;
extern crate rustc_session;
extern crate rustc_span;

use rustc_ast::{Attribute, Expr, ExprKind, Item, ItemKind, MacCall};
use rustc_lint::{EarlyContext, EarlyLintPass};
use rustc_session::{declare_lint_pass, declare_tool_lint, impl_lint_pass};
use rustc_span::symbol::sym;

declare_tool_lint! {
    /// **What it does:** Forbids use of `println!`, `eprintln!`, and `dbg!` macros in library code.
    ///
    /// **Why is this bad?** These macros bypass structured logging:
    /// - They write directly to stdout/stderr, without the `batch_id` field
    /// - They ignore the subscriber's level filter, so payload bodies logged
    ///   with them show up even when `debug` is off
    ///
    /// **Known problems:** None.
    ///
    /// **Example:**
    /// ```rust,ignore
    /// // Bad - bypasses BatchLog
    /// println!("Found {} audit record(s)", records.len());
    /// eprintln!("Error: {}", err);
    /// dbg!(payload);
    ///
    /// // Good - uses structured logging
    /// use vault_notify::BatchLog;
    /// let log = BatchLog::new(batch_id);
    /// log.info(format_args!("Found {} audit record(s)", records.len()));
    /// ```
    pub enforcement_pack::NO_PRINTLN,
    Deny,
    "use of println!, eprintln!, or dbg! macros; use BatchLog or tracing instead"
}

declare_lint_pass!(NoPrintln => [NO_PRINTLN]);

impl EarlyLintPass for NoPrintln {
    fn check_expr(&mut self, cx: &EarlyContext<'_>, expr: &Expr) {
        if let ExprKind::MacCall(mac) = &expr.kind {
            check_macro(cx, mac, expr.span);
        }
    }
}

fn check_macro(cx: &EarlyContext<'_>, mac: &MacCall, span: rustc_span::Span) {
    let path = &mac.path;

    // Check if this is a single-segment macro call (println, eprintln, dbg)
    if path.segments.len() != 1 {
        return;
    }

    let macro_name = path.segments[0].ident.name.as_str();

    match macro_name {
        "println" => {
            rustc_lint::LintContext::span_lint(cx, NO_PRINTLN, span, |diag| {
                diag.help("use `tracing::info!` or `BatchLog` for structured logging");
                diag.note("`println!` skips the batch_id field and the level filter");
            });
        }
        "eprintln" => {
            rustc_lint::LintContext::span_lint(cx, NO_PRINTLN, span, |diag| {
                diag.help("use `tracing::error!` or `BatchLog` for structured logging");
                diag.note("`eprintln!` skips the batch_id field and the level filter");
            });
        }
        "dbg" => {
            rustc_lint::LintContext::span_lint(cx, NO_PRINTLN, span, |diag| {
                diag.help("use `tracing::debug!` or `BatchLog` for structured logging");
                diag.note("`dbg!` skips the batch_id field and the level filter");
            });
        }
        _ => {}
    }
}

declare_tool_lint! {
    /// **What it does:** Forbids `.unwrap()` and `.expect(..)` in library code.
    /// Items marked `#[test]` or `#[cfg(test)]`, and `mod tests`, are exempt.
    ///
    /// **Why is this bad?** A panic while decoding one payload takes the
    /// whole batch down with it, and none of the other failures get reported.
    ///
    /// **Known problems:** Only method-call syntax is checked;
    /// `Option::unwrap(x)` slips through.
    ///
    /// **Example:**
    /// ```rust,ignore
    /// // Bad - panics on a malformed timestamp
    /// let time = DateTime::parse_from_rfc3339(text).unwrap();
    ///
    /// // Good - the error carries the field path into the batch outcome
    /// let time = DateTime::parse_from_rfc3339(text)
    ///     .map_err(|e| DecodeError::new(DecodeErrorKind::InvalidValue, "bad time").with_source(e))?;
    /// ```
    pub enforcement_pack::NO_UNWRAP,
    Deny,
    "use of .unwrap() or .expect() outside tests; propagate the error instead"
}

#[derive(Default)]
struct NoUnwrap {
    test_depth: usize,
}

impl_lint_pass!(NoUnwrap => [NO_UNWRAP]);

impl EarlyLintPass for NoUnwrap {
    fn check_item(&mut self, _cx: &EarlyContext<'_>, item: &Item) {
        if is_test_item(item) {
            self.test_depth += 1;
        }
    }

    fn check_item_post(&mut self, _cx: &EarlyContext<'_>, item: &Item) {
        if is_test_item(item) {
            self.test_depth -= 1;
        }
    }

    fn check_expr(&mut self, cx: &EarlyContext<'_>, expr: &Expr) {
        if self.test_depth > 0 {
            return;
        }
        if let ExprKind::MethodCall(call) = &expr.kind {
            let method = call.seg.ident.name.as_str();
            if method == "unwrap" || method == "expect" {
                rustc_lint::LintContext::span_lint(cx, NO_UNWRAP, expr.span, |diag| {
                    diag.help("return a `DecodeError` (or other error) with `?` instead");
                });
            }
        }
    }
}

fn is_test_item(item: &Item) -> bool {
    if let ItemKind::Mod(..) = &item.kind {
        if item.kind.ident().is_some_and(|ident| ident.name.as_str() == "tests") {
            return true;
        }
    }
    item.attrs.iter().any(is_test_attr)
}

fn is_test_attr(attr: &Attribute) -> bool {
    if attr.has_name(sym::test) {
        return true;
    }
    attr.has_name(sym::cfg)
        && attr
            .meta_item_list()
            .is_some_and(|items| items.iter().any(|item| item.has_name(sym::test)))
}

#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub extern "C" fn register_lints(_sess: &rustc_session::Session, lint_store: &mut rustc_lint::LintStore) {
    lint_store.register_lints(&[&NO_PRINTLN, &NO_UNWRAP]);
    lint_store.register_early_pass(|| Box::new(NoPrintln));
    lint_store.register_early_pass(|| Box::new(NoUnwrap::default()));
}

#[unsafe(no_mangle)]
pub fn dylint_version() -> *mut std::os::raw::c_char {
    std::ffi::CString::new(dylint_linting::DYLINT_VERSION)
        .expect("version string contains null byte")
        .into_raw()
}
