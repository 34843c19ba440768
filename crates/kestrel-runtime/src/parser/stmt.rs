//! Statement parsing

use crate::ast::*;
use crate::parser::Parser;
use crate::span::Span;
use crate::token::TokenKind;
use std::rc::Rc;

impl Parser {
    /// Parse a statement
    pub(super) fn parse_statement(&mut self) -> Result<Stmt, ()> {
        match self.peek().kind {
            TokenKind::Var => self.parse_var_decl(),
            TokenKind::Fn => Ok(Stmt::FunctionDecl(Rc::new(self.parse_function("function")?))),
            TokenKind::Class => self.parse_class_decl(),
            TokenKind::Print => self.parse_print_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Break => self.parse_break_stmt(),
            TokenKind::Continue => self.parse_continue_stmt(),
            TokenKind::Throw => self.parse_throw_stmt(),
            TokenKind::Try => self.parse_try_stmt(),
            TokenKind::LeftBrace => Ok(Stmt::Block(self.parse_block()?)),
            _ => self.parse_expr_stmt(),
        }
    }

    /// Parse a variable declaration
    pub(super) fn parse_var_decl(&mut self) -> Result<Stmt, ()> {
        let keyword_span = self.consume(TokenKind::Var, "Expected 'var'")?.span;

        let name_token = self.consume_identifier("a variable name")?;
        let name = Identifier {
            name: name_token.lexeme.clone(),
            span: name_token.span,
        };

        let init = if self.match_token(TokenKind::Equal) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let end_span = self
            .consume(
                TokenKind::Semicolon,
                "Expected ';' after variable declaration",
            )?
            .span;

        Ok(Stmt::VarDecl(VarDecl {
            name,
            init,
            span: keyword_span.merge(end_span),
        }))
    }

    /// Parse a function or method declaration
    ///
    /// `kind` is "function" or "method", used only in error messages.
    pub(super) fn parse_function(&mut self, kind: &str) -> Result<FunctionDecl, ()> {
        let fn_span = self.consume(TokenKind::Fn, "Expected 'fn'")?.span;

        let name_token = self.consume_identifier(&format!("a {} name", kind))?;
        let name = Identifier {
            name: name_token.lexeme.clone(),
            span: name_token.span,
        };

        self.consume(
            TokenKind::LeftParen,
            &format!("Expected '(' after {} name", kind),
        )?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let param_token = self.consume_identifier("a parameter name")?;
                params.push(Identifier {
                    name: param_token.lexeme.clone(),
                    span: param_token.span,
                });

                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenKind::RightParen, "Expected ')' after parameters")?;

        let body = self.parse_block()?;
        let end_span = body.span;

        Ok(FunctionDecl {
            name,
            params,
            body,
            span: fn_span.merge(end_span),
        })
    }

    /// Parse a class declaration
    pub(super) fn parse_class_decl(&mut self) -> Result<Stmt, ()> {
        let class_span = self.consume(TokenKind::Class, "Expected 'class'")?.span;

        let name_token = self.consume_identifier("a class name")?;
        let name = Identifier {
            name: name_token.lexeme.clone(),
            span: name_token.span,
        };

        let superclass = if self.match_token(TokenKind::Colon) {
            let super_token = self.consume_identifier("a superclass name")?;
            let super_name = Identifier {
                name: super_token.lexeme.clone(),
                span: super_token.span,
            };
            Some(VariableExpr {
                id: self.mint_id(),
                name: super_name,
            })
        } else {
            None
        };

        self.consume(TokenKind::LeftBrace, "Expected '{' before class body")?;

        let mut methods = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            match self.parse_function("method") {
                Ok(method) => methods.push(Rc::new(method)),
                Err(_) => self.synchronize(),
            }
        }

        let end_span = self
            .consume(TokenKind::RightBrace, "Expected '}' after class body")?
            .span;

        Ok(Stmt::ClassDecl(ClassDecl {
            name,
            superclass,
            methods,
            span: class_span.merge(end_span),
        }))
    }

    /// Parse a print statement
    pub(super) fn parse_print_stmt(&mut self) -> Result<Stmt, ()> {
        let print_span = self.consume(TokenKind::Print, "Expected 'print'")?.span;
        let expr = self.parse_expression()?;
        let end_span = self
            .consume(TokenKind::Semicolon, "Expected ';' after print value")?
            .span;

        Ok(Stmt::Print(PrintStmt {
            expr,
            span: print_span.merge(end_span),
        }))
    }

    /// Parse an expression statement
    pub(super) fn parse_expr_stmt(&mut self) -> Result<Stmt, ()> {
        let expr = self.parse_expression()?;
        let expr_span = expr.span();
        let end_span = self
            .consume(TokenKind::Semicolon, "Expected ';' after expression")?
            .span;

        Ok(Stmt::Expr(ExprStmt {
            expr,
            span: expr_span.merge(end_span),
        }))
    }

    /// Parse if statement
    pub(super) fn parse_if_stmt(&mut self) -> Result<Stmt, ()> {
        let if_span = self.consume(TokenKind::If, "Expected 'if'")?.span;

        self.consume(TokenKind::LeftParen, "Expected '(' after 'if'")?;
        let cond = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after if condition")?;

        let then_block = self.parse_block()?;
        let then_span = then_block.span;

        let else_branch = if self.match_token(TokenKind::Else) {
            if self.check(TokenKind::If) {
                Some(Box::new(self.parse_if_stmt()?))
            } else {
                Some(Box::new(Stmt::Block(self.parse_block()?)))
            }
        } else {
            None
        };

        let end_span = else_branch.as_ref().map_or(then_span, |s| s.span());

        Ok(Stmt::If(IfStmt {
            cond,
            then_block,
            else_branch,
            span: if_span.merge(end_span),
        }))
    }

    /// Parse while statement
    pub(super) fn parse_while_stmt(&mut self) -> Result<Stmt, ()> {
        let while_span = self.consume(TokenKind::While, "Expected 'while'")?.span;

        self.consume(TokenKind::LeftParen, "Expected '(' after 'while'")?;
        let cond = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after while condition")?;

        let body = self.parse_block()?;
        let body_span = body.span;

        Ok(Stmt::While(WhileStmt {
            cond,
            body,
            increment: None,
            span: while_span.merge(body_span),
        }))
    }

    /// Parse for statement
    ///
    /// `for (init; cond; step) body` desugars to a block holding the
    /// initializer followed by a while loop that carries the step as its
    /// increment, so `continue` still advances the induction variable.
    pub(super) fn parse_for_stmt(&mut self) -> Result<Stmt, ()> {
        let for_span = self.consume(TokenKind::For, "Expected 'for'")?.span;

        self.consume(TokenKind::LeftParen, "Expected '(' after 'for'")?;

        let init = if self.match_token(TokenKind::Semicolon) {
            None
        } else if self.check(TokenKind::Var) {
            Some(self.parse_var_decl()?)
        } else {
            let expr = self.parse_expression()?;
            let expr_span = expr.span();
            self.consume(TokenKind::Semicolon, "Expected ';' after for initializer")?;
            Some(Stmt::Expr(ExprStmt {
                expr,
                span: expr_span,
            }))
        };

        let cond = if self.check(TokenKind::Semicolon) {
            Expr::Literal(Literal::Bool(true), Span::dummy())
        } else {
            self.parse_expression()?
        };
        self.consume(TokenKind::Semicolon, "Expected ';' after for condition")?;

        let increment = if self.check(TokenKind::RightParen) {
            None
        } else {
            let expr = self.parse_expression()?;
            let expr_span = expr.span();
            Some(Box::new(Stmt::Expr(ExprStmt {
                expr,
                span: expr_span,
            })))
        };
        self.consume(TokenKind::RightParen, "Expected ')' after for clauses")?;

        let body = self.parse_block()?;
        let body_span = body.span;
        let span = for_span.merge(body_span);

        let mut statements = Vec::new();
        if let Some(init) = init {
            statements.push(init);
        }
        statements.push(Stmt::While(WhileStmt {
            cond,
            body,
            increment,
            span,
        }));

        Ok(Stmt::Block(Block { statements, span }))
    }

    /// Parse return statement
    pub(super) fn parse_return_stmt(&mut self) -> Result<Stmt, ()> {
        let return_span = self.consume(TokenKind::Return, "Expected 'return'")?.span;

        let value = if !self.check(TokenKind::Semicolon) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let end_span = self
            .consume(TokenKind::Semicolon, "Expected ';' after return")?
            .span;

        Ok(Stmt::Return(ReturnStmt {
            value,
            span: return_span.merge(end_span),
        }))
    }

    /// Parse break statement
    pub(super) fn parse_break_stmt(&mut self) -> Result<Stmt, ()> {
        let break_span = self.consume(TokenKind::Break, "Expected 'break'")?.span;
        let end_span = self
            .consume(TokenKind::Semicolon, "Expected ';' after break")?
            .span;
        Ok(Stmt::Break(break_span.merge(end_span)))
    }

    /// Parse continue statement
    pub(super) fn parse_continue_stmt(&mut self) -> Result<Stmt, ()> {
        let continue_span = self
            .consume(TokenKind::Continue, "Expected 'continue'")?
            .span;
        let end_span = self
            .consume(TokenKind::Semicolon, "Expected ';' after continue")?
            .span;
        Ok(Stmt::Continue(continue_span.merge(end_span)))
    }

    /// Parse throw statement
    pub(super) fn parse_throw_stmt(&mut self) -> Result<Stmt, ()> {
        let throw_span = self.consume(TokenKind::Throw, "Expected 'throw'")?.span;
        let value = self.parse_expression()?;
        let end_span = self
            .consume(TokenKind::Semicolon, "Expected ';' after throw value")?
            .span;

        Ok(Stmt::Throw(ThrowStmt {
            value,
            span: throw_span.merge(end_span),
        }))
    }

    /// Parse try statement
    pub(super) fn parse_try_stmt(&mut self) -> Result<Stmt, ()> {
        let try_span = self.consume(TokenKind::Try, "Expected 'try'")?.span;
        let body = self.parse_block()?;
        let mut end_span = body.span;

        let catch = if self.check(TokenKind::Catch) {
            let catch_span = self.advance().span;

            let binding = if self.match_token(TokenKind::LeftParen) {
                let name_token = self.consume_identifier("an exception binding name")?;
                let binding = Identifier {
                    name: name_token.lexeme.clone(),
                    span: name_token.span,
                };
                self.consume(TokenKind::RightParen, "Expected ')' after catch binding")?;
                Some(binding)
            } else {
                None
            };

            let catch_body = self.parse_block()?;
            end_span = catch_body.span;

            Some(CatchClause {
                binding,
                body: catch_body,
                span: catch_span.merge(end_span),
            })
        } else {
            None
        };

        let finally = if self.match_token(TokenKind::Finally) {
            let finally_body = self.parse_block()?;
            end_span = finally_body.span;
            Some(finally_body)
        } else {
            None
        };

        if catch.is_none() && finally.is_none() {
            self.error("Expected 'catch' or 'finally' after try block");
            return Err(());
        }

        Ok(Stmt::Try(TryStmt {
            body,
            catch,
            finally,
            span: try_span.merge(end_span),
        }))
    }

    /// Parse a block
    pub(super) fn parse_block(&mut self) -> Result<Block, ()> {
        let start_span = self.consume(TokenKind::LeftBrace, "Expected '{'")?.span;
        let mut statements = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(_) => self.synchronize(),
            }
        }

        let end_span = self.consume(TokenKind::RightBrace, "Expected '}'")?.span;

        Ok(Block {
            statements,
            span: start_span.merge(end_span),
        })
    }
}
