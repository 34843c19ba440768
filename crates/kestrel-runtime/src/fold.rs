//! Constant folding optimization pass
//!
//! Rewrites constant subexpressions into literals between parsing and
//! resolution:
//! - Binary arithmetic on number literals, `+` on two string literals
//! - Comparisons and equality on literal operands
//! - Unary negation of a number literal, `!` of any literal
//! - Parenthesized literals collapse to the literal
//!
//! Folding never changes observable behavior. Expressions that would
//! error at runtime (division or modulo by zero, mixed-type arithmetic)
//! are left for the interpreter to report, and `and`/`or` stay unfolded
//! because their result is an operand value, not a boolean.
//!
//! One bottom-up traversal reaches the fixed point: children fold before
//! their parent, so `(2 + 3) * 4` collapses to `20` in a single run.

use crate::ast::*;
use std::rc::Rc;

/// Statistics from one folding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldStats {
    /// Number of expressions replaced by a literal
    pub expressions_folded: usize,
}

/// Fold constant subexpressions in `program`, in place
pub fn fold_program(program: &mut Program) -> FoldStats {
    let mut folder = Folder { folded: 0 };
    for statement in &mut program.statements {
        folder.fold_stmt(statement);
    }
    FoldStats {
        expressions_folded: folder.folded,
    }
}

struct Folder {
    folded: usize,
}

impl Folder {
    fn fold_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::VarDecl(var) => {
                if let Some(init) = &mut var.init {
                    self.fold_expr(init);
                }
            }
            Stmt::FunctionDecl(decl) => self.fold_function(decl),
            Stmt::ClassDecl(class) => {
                for method in &mut class.methods {
                    self.fold_function(method);
                }
            }
            Stmt::Print(print) => self.fold_expr(&mut print.expr),
            Stmt::If(if_stmt) => {
                self.fold_expr(&mut if_stmt.cond);
                self.fold_block(&mut if_stmt.then_block);
                if let Some(else_branch) = &mut if_stmt.else_branch {
                    self.fold_stmt(else_branch);
                }
            }
            Stmt::While(while_stmt) => {
                self.fold_expr(&mut while_stmt.cond);
                self.fold_block(&mut while_stmt.body);
                if let Some(increment) = &mut while_stmt.increment {
                    self.fold_stmt(increment);
                }
            }
            Stmt::Return(return_stmt) => {
                if let Some(value) = &mut return_stmt.value {
                    self.fold_expr(value);
                }
            }
            Stmt::Throw(throw) => self.fold_expr(&mut throw.value),
            Stmt::Try(try_stmt) => {
                self.fold_block(&mut try_stmt.body);
                if let Some(catch) = &mut try_stmt.catch {
                    self.fold_block(&mut catch.body);
                }
                if let Some(finally) = &mut try_stmt.finally {
                    self.fold_block(finally);
                }
            }
            Stmt::Block(block) => self.fold_block(block),
            Stmt::Expr(expr_stmt) => self.fold_expr(&mut expr_stmt.expr),
            Stmt::Break(_) | Stmt::Continue(_) => {}
        }
    }

    /// Fold inside a function body
    ///
    /// Declarations are uniquely owned straight out of the parser; a
    /// shared one (already captured by a closure value) is left as is.
    fn fold_function(&mut self, decl: &mut Rc<FunctionDecl>) {
        if let Some(decl) = Rc::get_mut(decl) {
            self.fold_block(&mut decl.body);
        }
    }

    fn fold_block(&mut self, block: &mut Block) {
        for statement in &mut block.statements {
            self.fold_stmt(statement);
        }
    }

    fn fold_expr(&mut self, expr: &mut Expr) {
        // Children first
        match expr {
            Expr::Literal(..) | Expr::Variable(_) | Expr::This(_) | Expr::Super(_) => {}
            Expr::Assign(assign) => self.fold_expr(&mut assign.value),
            Expr::Unary(unary) => self.fold_expr(&mut unary.expr),
            Expr::Binary(binary) => {
                self.fold_expr(&mut binary.left);
                self.fold_expr(&mut binary.right);
            }
            Expr::Call(call) => {
                self.fold_expr(&mut call.callee);
                for arg in &mut call.args {
                    self.fold_expr(arg);
                }
            }
            Expr::Index(index) => {
                self.fold_expr(&mut index.target);
                self.fold_expr(&mut index.index);
            }
            Expr::IndexSet(index_set) => {
                self.fold_expr(&mut index_set.target);
                self.fold_expr(&mut index_set.index);
                self.fold_expr(&mut index_set.value);
            }
            Expr::Get(get) => self.fold_expr(&mut get.object),
            Expr::Set(set) => {
                self.fold_expr(&mut set.object);
                self.fold_expr(&mut set.value);
            }
            Expr::ListLiteral(list) => {
                for element in &mut list.elements {
                    self.fold_expr(element);
                }
            }
            Expr::Group(group) => self.fold_expr(&mut group.expr),
        }

        // Then this node
        let replacement = match &*expr {
            Expr::Unary(unary) => fold_unary(unary),
            Expr::Binary(binary) => fold_binary(binary),
            Expr::Group(group) => fold_group(group),
            _ => None,
        };
        if let Some(folded) = replacement {
            self.folded += 1;
            *expr = folded;
        }
    }
}

fn fold_unary(unary: &UnaryExpr) -> Option<Expr> {
    let Expr::Literal(literal, _) = unary.expr.as_ref() else {
        return None;
    };
    let folded = match (unary.op, literal) {
        (UnaryOp::Negate, Literal::Number(n)) => Literal::Number(-n),
        // Negating a non-number is a runtime error; keep it
        (UnaryOp::Negate, _) => return None,
        (UnaryOp::Not, literal) => Literal::Bool(!literal_truthy(literal)),
    };
    Some(Expr::Literal(folded, unary.span))
}

/// Attempt to fold a binary operation on two literal operands
///
/// Returns `None` when the operation would produce a runtime error
/// (division by zero, mixed-type arithmetic) or when its semantics are
/// not a literal (`and`/`or` yield an operand).
fn fold_binary(binary: &BinaryExpr) -> Option<Expr> {
    let (Expr::Literal(left, _), Expr::Literal(right, _)) =
        (binary.left.as_ref(), binary.right.as_ref())
    else {
        return None;
    };

    let folded = match binary.op {
        BinaryOp::Add => match (left, right) {
            (Literal::Number(a), Literal::Number(b)) => Literal::Number(a + b),
            (Literal::String(a), Literal::String(b)) => Literal::String(format!("{}{}", a, b)),
            // String/number concatenation stays with the interpreter so the
            // folded text can never drift from Value's number formatting
            _ => return None,
        },
        BinaryOp::Sub => numeric(left, right, |a, b| a - b)?,
        BinaryOp::Mul => numeric(left, right, |a, b| a * b)?,
        BinaryOp::Div => {
            let (a, b) = numbers(left, right)?;
            if b == 0.0 {
                return None;
            }
            Literal::Number(a / b)
        }
        BinaryOp::Mod => {
            let (a, b) = numbers(left, right)?;
            if b == 0.0 {
                return None;
            }
            Literal::Number(a % b)
        }
        BinaryOp::Eq => Literal::Bool(literal_eq(left, right)),
        BinaryOp::Ne => Literal::Bool(!literal_eq(left, right)),
        BinaryOp::Lt => comparison(left, right, |a, b| a < b)?,
        BinaryOp::Le => comparison(left, right, |a, b| a <= b)?,
        BinaryOp::Gt => comparison(left, right, |a, b| a > b)?,
        BinaryOp::Ge => comparison(left, right, |a, b| a >= b)?,
        BinaryOp::And | BinaryOp::Or => return None,
    };
    Some(Expr::Literal(folded, binary.span))
}

fn fold_group(group: &GroupExpr) -> Option<Expr> {
    let Expr::Literal(literal, _) = group.expr.as_ref() else {
        return None;
    };
    Some(Expr::Literal(literal.clone(), group.span))
}

fn numbers(left: &Literal, right: &Literal) -> Option<(f64, f64)> {
    match (left, right) {
        (Literal::Number(a), Literal::Number(b)) => Some((*a, *b)),
        _ => None,
    }
}

fn numeric(left: &Literal, right: &Literal, op: impl Fn(f64, f64) -> f64) -> Option<Literal> {
    let (a, b) = numbers(left, right)?;
    Some(Literal::Number(op(a, b)))
}

/// Ordering comparisons are number-only at runtime; anything else stays
/// for the interpreter's type error
fn comparison(left: &Literal, right: &Literal, op: impl Fn(f64, f64) -> bool) -> Option<Literal> {
    let (a, b) = numbers(left, right)?;
    Some(Literal::Bool(op(a, b)))
}

/// Literal equality, mirroring runtime equality on primitives exactly
fn literal_eq(left: &Literal, right: &Literal) -> bool {
    match (left, right) {
        (Literal::Number(a), Literal::Number(b)) => a == b,
        (Literal::String(a), Literal::String(b)) => a == b,
        (Literal::Bool(a), Literal::Bool(b)) => a == b,
        (Literal::Null, Literal::Null) => true,
        _ => false,
    }
}

fn literal_truthy(literal: &Literal) -> bool {
    match literal {
        Literal::Null => false,
        Literal::Bool(b) => *b,
        Literal::Number(n) => *n != 0.0,
        Literal::String(s) => !s.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn parse(source: &str) -> Program {
        let (tokens, diagnostics) = Lexer::new(source).tokenize();
        assert!(diagnostics.is_empty(), "lex errors: {:?}", diagnostics);
        let (program, diagnostics) = Parser::new(tokens).parse();
        assert!(diagnostics.is_empty(), "parse errors: {:?}", diagnostics);
        program
    }

    fn folded_expr(source: &str) -> (Expr, FoldStats) {
        let mut program = parse(source);
        let stats = fold_program(&mut program);
        let Some(Stmt::Expr(expr_stmt)) = program.statements.into_iter().next() else {
            panic!("expected a single expression statement");
        };
        (expr_stmt.expr, stats)
    }

    #[test]
    fn test_folds_nested_arithmetic() {
        let (expr, stats) = folded_expr("(2 + 3) * 4;");
        assert!(matches!(expr, Expr::Literal(Literal::Number(n), _) if n == 20.0));
        assert!(stats.expressions_folded >= 2);
    }

    #[test]
    fn test_folds_unary() {
        let (expr, _) = folded_expr("-3;");
        assert!(matches!(expr, Expr::Literal(Literal::Number(n), _) if n == -3.0));

        let (expr, _) = folded_expr("!\"\";");
        assert!(matches!(expr, Expr::Literal(Literal::Bool(true), _)));

        let (expr, _) = folded_expr("!1;");
        assert!(matches!(expr, Expr::Literal(Literal::Bool(false), _)));
    }

    #[test]
    fn test_preserves_division_by_zero() {
        let (expr, stats) = folded_expr("1 / 0;");
        assert!(matches!(expr, Expr::Binary(_)));
        assert_eq!(stats.expressions_folded, 0);

        let (expr, _) = folded_expr("5 % 0;");
        assert!(matches!(expr, Expr::Binary(_)));
    }

    #[test]
    fn test_preserves_mixed_type_arithmetic() {
        let (expr, _) = folded_expr("\"x\" + 1;");
        assert!(matches!(expr, Expr::Binary(_)));

        let (expr, _) = folded_expr("-true;");
        assert!(matches!(expr, Expr::Unary(_)));
    }

    #[test]
    fn test_folds_string_concatenation() {
        let (expr, _) = folded_expr("\"foo\" + \"bar\";");
        assert!(matches!(expr, Expr::Literal(Literal::String(s), _) if s == "foobar"));
    }

    #[test]
    fn test_folds_comparisons_and_equality() {
        let (expr, _) = folded_expr("1 < 2;");
        assert!(matches!(expr, Expr::Literal(Literal::Bool(true), _)));

        let (expr, _) = folded_expr("\"a\" == \"a\";");
        assert!(matches!(expr, Expr::Literal(Literal::Bool(true), _)));

        let (expr, _) = folded_expr("null == 0;");
        assert!(matches!(expr, Expr::Literal(Literal::Bool(false), _)));

        let (expr, _) = folded_expr("1 != 2;");
        assert!(matches!(expr, Expr::Literal(Literal::Bool(true), _)));
    }

    #[test]
    fn test_string_ordering_stays_for_runtime_error() {
        let (expr, _) = folded_expr("\"a\" < \"b\";");
        assert!(matches!(expr, Expr::Binary(_)));
    }

    #[test]
    fn test_logical_operators_unfolded() {
        let (expr, _) = folded_expr("true and false;");
        assert!(matches!(expr, Expr::Binary(_)));

        let (expr, _) = folded_expr("null or 3;");
        assert!(matches!(expr, Expr::Binary(_)));
    }

    #[test]
    fn test_folds_inside_declarations() {
        let mut program = parse("fn f() { return 1 + 2; } var x = 2 * 3;");
        let stats = fold_program(&mut program);
        assert_eq!(stats.expressions_folded, 2);

        let Stmt::FunctionDecl(decl) = &program.statements[0] else {
            panic!("expected a function declaration");
        };
        let Stmt::Return(return_stmt) = &decl.body.statements[0] else {
            panic!("expected a return statement");
        };
        assert!(matches!(
            return_stmt.value,
            Some(Expr::Literal(Literal::Number(n), _)) if n == 3.0
        ));
    }

    #[test]
    fn test_folds_list_elements_and_call_args() {
        let mut program = parse("f([1 + 1, 2 * 2], 3 - 1);");
        let stats = fold_program(&mut program);
        assert_eq!(stats.expressions_folded, 3);
    }
}
