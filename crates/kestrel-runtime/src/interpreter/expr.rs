//! Expression evaluation

use crate::ast::*;
use crate::environment::Environment;
use crate::interpreter::Interpreter;
use crate::span::Span;
use crate::value::{RuntimeError, Value};

impl Interpreter {
    /// Evaluate an expression
    pub(super) fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(lit, _) => Ok(self.eval_literal(lit)),
            Expr::Variable(variable) => {
                self.look_up_variable(variable.id, &variable.name.name, variable.name.span)
            }
            Expr::Assign(assign) => self.eval_assign(assign),
            Expr::Unary(unary) => self.eval_unary(unary),
            Expr::Binary(binary) => self.eval_binary(binary),
            Expr::Call(call) => self.eval_call(call),
            Expr::Index(index) => self.eval_index(index),
            Expr::IndexSet(index_set) => self.eval_index_set(index_set),
            Expr::Get(get) => self.eval_get(get),
            Expr::Set(set) => self.eval_set(set),
            Expr::ListLiteral(list) => self.eval_list_literal(list),
            Expr::Group(group) => self.evaluate(&group.expr),
            Expr::This(this) => self.look_up_variable(this.id, "this", this.span),
            Expr::Super(super_expr) => self.eval_super(super_expr),
        }
    }

    /// Evaluate a literal
    pub(super) fn eval_literal(&self, lit: &Literal) -> Value {
        match lit {
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::string(s.clone()),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Null => Value::Null,
        }
    }

    /// Evaluate an assignment; the expression yields the assigned value
    fn eval_assign(&mut self, assign: &AssignExpr) -> Result<Value, RuntimeError> {
        let value = self.evaluate(&assign.value)?;
        self.assign_variable(assign.id, &assign.name.name, value.clone(), assign.name.span)?;
        Ok(value)
    }

    /// Evaluate a unary expression
    fn eval_unary(&mut self, unary: &UnaryExpr) -> Result<Value, RuntimeError> {
        let operand = self.evaluate(&unary.expr)?;

        match unary.op {
            UnaryOp::Negate => {
                if let Value::Number(n) = operand {
                    Ok(Value::Number(-n))
                } else {
                    Err(RuntimeError::TypeError {
                        msg: "Operand must be a number.".to_string(),
                        span: unary.span,
                    })
                }
            }
            UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
        }
    }

    /// Evaluate a binary expression
    fn eval_binary(&mut self, binary: &BinaryExpr) -> Result<Value, RuntimeError> {
        // and/or short-circuit and yield an operand, not a coerced bool
        if binary.op == BinaryOp::And {
            let left = self.evaluate(&binary.left)?;
            if !left.is_truthy() {
                return Ok(left);
            }
            return self.evaluate(&binary.right);
        }
        if binary.op == BinaryOp::Or {
            let left = self.evaluate(&binary.left)?;
            if left.is_truthy() {
                return Ok(left);
            }
            return self.evaluate(&binary.right);
        }

        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;

        match binary.op {
            BinaryOp::Add => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => {
                    Ok(Value::string(format!("{}{}", a, b)))
                }
                // Mixed string/number concatenation stringifies the number
                // through the single Display implementation
                (Value::String(a), Value::Number(_)) => {
                    Ok(Value::string(format!("{}{}", a, right)))
                }
                (Value::Number(_), Value::String(b)) => {
                    Ok(Value::string(format!("{}{}", left, b)))
                }
                _ => Err(RuntimeError::TypeError {
                    msg: "Operands must be numbers or strings.".to_string(),
                    span: binary.span,
                }),
            },
            BinaryOp::Sub => self.numeric_binary_op(left, right, binary.span, |a, b| a - b),
            BinaryOp::Mul => self.numeric_binary_op(left, right, binary.span, |a, b| a * b),
            BinaryOp::Div => {
                if let (Value::Number(a), Value::Number(b)) = (&left, &right) {
                    if *b == 0.0 {
                        return Err(RuntimeError::DivideByZero { span: binary.span });
                    }
                    Ok(Value::Number(a / b))
                } else {
                    Err(RuntimeError::TypeError {
                        msg: "Operands must be numbers.".to_string(),
                        span: binary.span,
                    })
                }
            }
            BinaryOp::Mod => {
                if let (Value::Number(a), Value::Number(b)) = (&left, &right) {
                    if *b == 0.0 {
                        return Err(RuntimeError::DivideByZero { span: binary.span });
                    }
                    Ok(Value::Number(a % b))
                } else {
                    Err(RuntimeError::TypeError {
                        msg: "Operands must be numbers.".to_string(),
                        span: binary.span,
                    })
                }
            }
            BinaryOp::Eq => Ok(Value::Bool(left == right)),
            BinaryOp::Ne => Ok(Value::Bool(left != right)),
            BinaryOp::Lt => self.numeric_comparison(left, right, binary.span, |a, b| a < b),
            BinaryOp::Le => self.numeric_comparison(left, right, binary.span, |a, b| a <= b),
            BinaryOp::Gt => self.numeric_comparison(left, right, binary.span, |a, b| a > b),
            BinaryOp::Ge => self.numeric_comparison(left, right, binary.span, |a, b| a >= b),
            BinaryOp::And | BinaryOp::Or => {
                // Handled above before operand evaluation
                Err(RuntimeError::TypeError {
                    msg: "Logical operator fell through.".to_string(),
                    span: binary.span,
                })
            }
        }
    }

    /// Helper for numeric binary operations
    fn numeric_binary_op<F>(
        &self,
        left: Value,
        right: Value,
        span: Span,
        op: F,
    ) -> Result<Value, RuntimeError>
    where
        F: FnOnce(f64, f64) -> f64,
    {
        if let (Value::Number(a), Value::Number(b)) = (left, right) {
            Ok(Value::Number(op(a, b)))
        } else {
            Err(RuntimeError::TypeError {
                msg: "Operands must be numbers.".to_string(),
                span,
            })
        }
    }

    /// Helper for numeric comparisons
    fn numeric_comparison<F>(
        &self,
        left: Value,
        right: Value,
        span: Span,
        op: F,
    ) -> Result<Value, RuntimeError>
    where
        F: FnOnce(f64, f64) -> bool,
    {
        if let (Value::Number(a), Value::Number(b)) = (left, right) {
            Ok(Value::Bool(op(a, b)))
        } else {
            Err(RuntimeError::TypeError {
                msg: "Operands must be numbers.".to_string(),
                span,
            })
        }
    }

    /// Evaluate a call: callee first, then arguments left to right
    fn eval_call(&mut self, call: &CallExpr) -> Result<Value, RuntimeError> {
        let callee = self.evaluate(&call.callee)?;

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.evaluate(arg)?);
        }

        self.call_value(&callee, args, call.span)
    }

    /// Evaluate a list index read
    fn eval_index(&mut self, index: &IndexExpr) -> Result<Value, RuntimeError> {
        let target = self.evaluate(&index.target)?;
        let idx = self.evaluate(&index.index)?;

        let Value::List(list) = &target else {
            return Err(RuntimeError::TypeError {
                msg: format!("Cannot index into a {}.", target.type_name()),
                span: index.span,
            });
        };
        let slot = list.checked_index(&idx, index.span)?;
        list.get(slot).ok_or_else(|| RuntimeError::IndexOutOfRange {
            index: slot as i64,
            len: list.len(),
            span: index.span,
        })
    }

    /// Evaluate a list index write; operands evaluate left to right before
    /// any validation
    fn eval_index_set(&mut self, index_set: &IndexSetExpr) -> Result<Value, RuntimeError> {
        let target = self.evaluate(&index_set.target)?;
        let idx = self.evaluate(&index_set.index)?;
        let value = self.evaluate(&index_set.value)?;

        let Value::List(list) = &target else {
            return Err(RuntimeError::TypeError {
                msg: format!("Cannot index into a {}.", target.type_name()),
                span: index_set.span,
            });
        };
        let slot = list.checked_index(&idx, index_set.span)?;
        list.set(slot, value.clone());
        Ok(value)
    }

    /// Evaluate a property read
    ///
    /// Instances: fields shadow methods, method hits bind `this`.
    /// Lists: the fixed builtin method table, bound to the receiver.
    fn eval_get(&mut self, get: &GetExpr) -> Result<Value, RuntimeError> {
        let object = self.evaluate(&get.object)?;

        match &object {
            Value::Instance(instance) => {
                if let Some(value) = instance.get_field(&get.name.name) {
                    return Ok(value);
                }
                if let Some(method) = instance.class.find_method(&get.name.name) {
                    return Ok(method.bind(&object));
                }
                Err(RuntimeError::UndefinedProperty {
                    name: get.name.name.clone(),
                    span: get.name.span,
                })
            }
            Value::List(_) => crate::list::bind_builtin(&get.name.name, &object).ok_or_else(|| {
                RuntimeError::UndefinedProperty {
                    name: get.name.name.clone(),
                    span: get.name.span,
                }
            }),
            _ => Err(RuntimeError::TypeError {
                msg: "Only instances and lists have properties.".to_string(),
                span: get.span,
            }),
        }
    }

    /// Evaluate a property write; fields are created on first write
    fn eval_set(&mut self, set: &SetExpr) -> Result<Value, RuntimeError> {
        let object = self.evaluate(&set.object)?;
        let value = self.evaluate(&set.value)?;

        let Value::Instance(instance) = &object else {
            return Err(RuntimeError::TypeError {
                msg: "Only instances have fields.".to_string(),
                span: set.span,
            });
        };
        instance.set_field(&set.name.name, value.clone());
        Ok(value)
    }

    /// Evaluate a list literal, elements left to right
    fn eval_list_literal(&mut self, list: &ListLiteral) -> Result<Value, RuntimeError> {
        let mut elements = Vec::with_capacity(list.elements.len());
        for element in &list.elements {
            elements.push(self.evaluate(element)?);
        }
        Ok(Value::list(elements))
    }

    /// Evaluate `super.method`: the superclass sits at the resolved depth,
    /// the receiver one frame closer
    fn eval_super(&mut self, super_expr: &SuperExpr) -> Result<Value, RuntimeError> {
        let Some(depth) = self.resolved_depth(super_expr.id) else {
            return Err(RuntimeError::UndefinedVariable {
                name: "super".to_string(),
                span: super_expr.span,
            });
        };

        let Some(Value::Class(superclass)) =
            Environment::get_at(&self.environment, depth, "super")
        else {
            return Err(RuntimeError::UndefinedVariable {
                name: "super".to_string(),
                span: super_expr.span,
            });
        };
        let instance = Environment::get_at(&self.environment, depth - 1, "this").ok_or_else(
            || RuntimeError::UndefinedVariable {
                name: "this".to_string(),
                span: super_expr.span,
            },
        )?;

        let method = superclass.find_method(&super_expr.method.name).ok_or_else(|| {
            RuntimeError::UndefinedProperty {
                name: super_expr.method.name.clone(),
                span: super_expr.method.span,
            }
        })?;
        Ok(method.bind(&instance))
    }
}

