use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::{spanned::Spanned, BinOp, Expr, ExprLit, ExprPath, LitStr, Path};

/// Marker wrapped around `#var` tokens by the prepass; its argument is
/// evaluated at run time and embedded as a literal value.
const EVALUATED_MARKER: &str = "__quern_evaluated__";

pub(crate) fn decode_expression(condition: &Expr) -> TokenStream {
    match condition {
        Expr::Binary(v) => {
            let op = match v.op {
                BinOp::Add(..) => quote! { ::quern::BinaryOpType::Addition },
                BinOp::Sub(..) => quote! { ::quern::BinaryOpType::Subtraction },
                BinOp::Mul(..) => quote! { ::quern::BinaryOpType::Multiplication },
                BinOp::Div(..) => quote! { ::quern::BinaryOpType::Division },
                BinOp::Rem(..) => quote! { ::quern::BinaryOpType::Remainder },
                BinOp::And(..) => quote! { ::quern::BinaryOpType::And },
                BinOp::Or(..) => quote! { ::quern::BinaryOpType::Or },
                BinOp::Eq(..) if is_none(&v.right) => quote! { ::quern::BinaryOpType::Is },
                BinOp::Ne(..) if is_none(&v.right) => quote! { ::quern::BinaryOpType::IsNot },
                BinOp::Eq(..) => quote! { ::quern::BinaryOpType::Equal },
                BinOp::Ne(..) => quote! { ::quern::BinaryOpType::NotEqual },
                BinOp::Lt(..) => quote! { ::quern::BinaryOpType::Less },
                BinOp::Le(..) => quote! { ::quern::BinaryOpType::LessEqual },
                BinOp::Ge(..) => quote! { ::quern::BinaryOpType::GreaterEqual },
                BinOp::Gt(..) => quote! { ::quern::BinaryOpType::Greater },
                _ => panic!("Unsupported operator `{}`", v.op.to_token_stream()),
            };
            let lhs = decode_expression(&v.left);
            let rhs = decode_expression(&v.right);
            quote! {
                ::quern::BinaryOp {
                    op: #op,
                    lhs: #lhs,
                    rhs: #rhs,
                }
            }
        }
        Expr::Unary(v) => {
            let op = match v.op {
                syn::UnOp::Not(..) => quote! { ::quern::UnaryOpType::Not },
                syn::UnOp::Neg(..) => quote! { ::quern::UnaryOpType::Negative },
                _ => panic!("Unsupported operator `{}`", v.op.to_token_stream()),
            };
            let v = decode_expression(v.expr.as_ref());
            quote! {
                ::quern::UnaryOp {
                    op: #op,
                    v: #v,
                }
            }
        }
        Expr::MethodCall(v) => {
            let (prefix, suffix) = match v.method.to_string().as_str() {
                "contains" => ("%", "%"),
                "starts_with" => ("", "%"),
                "ends_with" => ("%", ""),
                unknown => panic!("Unsupported method `{}` in a sql expression", unknown),
            };
            let lhs = decode_expression(&v.receiver);
            let arg = v
                .args
                .first()
                .unwrap_or_else(|| panic!("`{}` takes a pattern argument", v.method));
            let rhs = match arg {
                Expr::Lit(ExprLit {
                    lit: syn::Lit::Str(s),
                    ..
                }) => {
                    let pattern =
                        LitStr::new(&format!("{}{}{}", prefix, s.value(), suffix), s.span());
                    quote! { ::quern::Operand::LitStr(#pattern) }
                }
                other => {
                    let template =
                        LitStr::new(&format!("{}{{}}{}", prefix, suffix), other.span());
                    let inner = evaluated_argument(other)
                        .unwrap_or_else(|| other.to_token_stream());
                    quote! {
                        ::quern::Operand::Variable(::quern::Value::Varchar(Some(
                            format!(#template, #inner),
                        )))
                    }
                }
            };
            quote! {
                ::quern::BinaryOp {
                    op: ::quern::BinaryOpType::Like,
                    lhs: #lhs,
                    rhs: #rhs,
                }
            }
        }
        Expr::Call(v) => {
            let Some(inner) = evaluated_argument(condition) else {
                panic!(
                    "Unexpected call `{}` in a sql expression",
                    v.to_token_stream()
                );
            };
            quote! { ::quern::Operand::Variable(::quern::Value::from((#inner).clone())) }
        }
        Expr::Lit(ExprLit { lit: v, .. }) => match v {
            syn::Lit::Str(v) => quote! { ::quern::Operand::LitStr(#v) },
            syn::Lit::Char(v) => {
                let v = LitStr::new(&v.value().to_string(), v.span());
                quote! { ::quern::Operand::LitStr(#v) }
            }
            syn::Lit::Int(v) => quote! { ::quern::Operand::LitInt(#v) },
            syn::Lit::Float(v) => quote! { ::quern::Operand::LitFloat(#v) },
            syn::Lit::Bool(v) => quote! { ::quern::Operand::LitBool(#v) },
            _ => panic!(
                "Unexpected value {:?} in a sql expression",
                v.into_token_stream()
            ),
        },
        Expr::Paren(v) => decode_expression(&v.expr),
        Expr::Group(v) => decode_expression(&v.expr),
        Expr::Path(ExprPath { path, .. }) => {
            if is_none_path(path) {
                quote! { ::quern::Operand::Null }
            } else if path.segments.len() > 1 {
                // Entity::field associated constants generated by the derive
                quote! { ::quern::Operand::Column(#path) }
            } else {
                let v = LitStr::new(&path.to_token_stream().to_string(), path.span());
                quote! { ::quern::Operand::LitIdent(#v) }
            }
        }
        _ => panic!(
            "Unexpected expression `{}`",
            condition.to_token_stream()
        ),
    }
}

/// The argument tokens of an `__quern_evaluated__(..)` marker call, if the
/// expression is one.
fn evaluated_argument(expr: &Expr) -> Option<TokenStream> {
    let expr = match expr {
        Expr::Group(v) => v.expr.as_ref(),
        other => other,
    };
    let Expr::Call(call) = expr else {
        return None;
    };
    let Expr::Path(ExprPath { path, .. }) = call.func.as_ref() else {
        return None;
    };
    if !path.is_ident(EVALUATED_MARKER) {
        return None;
    }
    call.args.first().map(ToTokens::to_token_stream)
}

fn is_none(expr: &Expr) -> bool {
    match expr {
        Expr::Group(v) => is_none(&v.expr),
        Expr::Path(ExprPath { path, .. }) => is_none_path(path),
        _ => false,
    }
}

fn is_none_path(path: &Path) -> bool {
    path.segments.iter().map(|v| &v.ident).eq(["None"].iter())
}
