//! Debug commands: `lex` and `parse` for inspecting the front end.

use mol_diagnostic::ColorMode;
use mol_eval::ExitStatus;
use mol_ir::ast::StmtKind;
use mol_ir::StringInterner;
use mol_parse::SyntaxError;

use super::with_source_file;

/// Lex a file and display the token stream.
pub fn lex_file(path: &str, color: ColorMode) -> ExitStatus {
    with_source_file(path, color, |source| {
        let interner = StringInterner::new();
        let tokens = mol_lexer::lex(source, &interner).map_err(SyntaxError::from)?;

        println!("Tokens for '{}' ({} tokens):", path, tokens.len());
        for token in &tokens {
            println!("  {:?} @ {}", token.kind, token.span);
        }
        Ok(())
    })
}

/// Parse a file and display a summary of its top-level statements.
pub fn parse_file(path: &str, color: ColorMode) -> ExitStatus {
    with_source_file(path, color, |source| {
        let interner = StringInterner::new();
        let program = mol_parse::parse_source(source, &interner)?;

        let functions: Vec<_> = program
            .statements
            .iter()
            .filter_map(|stmt| match &stmt.kind {
                StmtKind::Function(decl) => Some(decl),
                _ => None,
            })
            .collect();

        println!("Parse result for '{path}':");
        println!("  Statements: {}", program.statements.len());
        println!("  Functions: {}", functions.len());

        if !functions.is_empty() {
            println!();
            println!("Functions:");
            for decl in functions {
                let params: Vec<_> = decl
                    .params
                    .iter()
                    .map(|p| interner.lookup(p.name))
                    .collect();
                println!("  {}({}) @ {}", interner.lookup(decl.name), params.join(", "), decl.span);
            }
        }
        Ok(())
    })
}
