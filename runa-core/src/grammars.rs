//! 内置演示文法
//!
//! - `pairs`：`A -> oAc | ε` 形式的成对符号词法文法
//! - `parens`：任意平衡括号的词法文法
//! - `groups`：把括号嵌套组装为元素树的语法文法
//! - `arith`：`line -> expr EOF`，`expr -> a ('+' expr)?`

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use crate::kit::graph::{Graph, GraphError, Path, StateRef};
use crate::kit::matcher::RuneMatcher;
use crate::kit::source::RuneSource;
use crate::lexer::{LexError, LexGraphBuilder, LexMachine, LexState};
use crate::parser::{Element, ParseGraphBuilder, ParseMachine, ParseState, StateType};

/// 演示文法的令牌类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemoKind {
    Symbol,
    Group,
    Line,
    Expr,
    Operand,
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DemoKind::Symbol => "symbol",
            DemoKind::Group => "group",
            DemoKind::Line => "line",
            DemoKind::Expr => "expr",
            DemoKind::Operand => "operand",
        };
        f.write_str(name)
    }
}

/// 状态图与其配对表
#[derive(Debug)]
pub struct Grammar<S> {
    pub graph: Arc<Graph<S>>,
    pub matcher: RuneMatcher,
}

impl<S> Clone for Grammar<S> {
    fn clone(&self) -> Self {
        Self {
            graph: Arc::clone(&self.graph),
            matcher: self.matcher.clone(),
        }
    }
}

impl<K: Clone + fmt::Debug> Grammar<LexState<K>> {
    pub fn lexer<R: Read>(&self, source: RuneSource<R>) -> Result<LexMachine<K, R>, LexError> {
        LexMachine::new(source, Arc::clone(&self.graph), self.matcher.clone())
    }
}

impl<K: Clone + fmt::Debug> Grammar<ParseState<K>> {
    pub fn parser<R: Read>(&self, source: RuneSource<R>) -> ParseMachine<K, R> {
        ParseMachine::new(source, Arc::clone(&self.graph), self.matcher.clone())
    }
}

/// `A -> oAc | ε`
///
/// 开符号所在状态为 Storer，闭符号所在状态为 Matcher，每个字符一个令牌。
pub fn pairs(open: char, close: char) -> Result<Grammar<LexState<DemoKind>>, GraphError> {
    let mut b = LexGraphBuilder::new();
    let opening = b.add_state(LexState::storer().emitting(DemoKind::Symbol))?;
    let closing = b.add_state(LexState::matcher().emitting(DemoKind::Symbol))?;

    b.link(opening, open, opening)?;
    b.link(opening, close, closing)?;
    b.connect(opening, Path::EOF, StateRef::Accept)?;
    b.link(closing, close, closing)?;
    b.connect(closing, Path::EOF, StateRef::Accept)?;

    Ok(Grammar {
        graph: Arc::new(b.build(opening, None)?),
        matcher: RuneMatcher::with_pairs([(open, close)]),
    })
}

/// 任意嵌套、并列的圆括号
pub fn parens() -> Result<Grammar<LexState<DemoKind>>, GraphError> {
    let mut b = LexGraphBuilder::new();
    let start = b.add_state(LexState::feeder().emitting(DemoKind::Symbol))?;
    let opening = b.add_state(LexState::storer().emitting(DemoKind::Symbol))?;
    let closing = b.add_state(LexState::matcher().emitting(DemoKind::Symbol))?;

    b.link(start, '(', opening)?;
    b.connect(start, Path::EOF, StateRef::Accept)?;
    for from in [opening, closing] {
        b.link(from, '(', opening)?;
        b.link(from, ')', closing)?;
    }
    b.connect(closing, Path::EOF, StateRef::Accept)?;

    Ok(Grammar {
        graph: Arc::new(b.build(start, None)?),
        matcher: RuneMatcher::with_pairs([('(', ')')]),
    })
}

/// 每对括号一个 `group` 节点，挂在 `root` 之下
///
/// 开括号的令牌属于新节点；闭括号在节点并入父节点之后发射，归属父节点。
pub fn groups() -> Result<Grammar<ParseState<DemoKind>>, GraphError> {
    let group = || Element::new("group", DemoKind::Group);

    let mut b = ParseGraphBuilder::new();
    let root = b.add_state(ParseState::new(
        StateType::nonterminal(),
        Element::new("root", DemoKind::Group),
    ))?;
    let pick = b.add_state(ParseState::new(StateType::buffer(), group()))?;
    let open = b.add_state(ParseState::new(
        StateType::nonterminal().matching().emitting(),
        group(),
    ))?;
    let close = b.add_state(ParseState::new(
        StateType::terminal().matching().emitting(),
        group(),
    ))?;
    let end = b.add_state(ParseState::new(StateType::terminal(), group()))?;

    b.link(root, Path::Default, pick)?;
    b.link(pick, '(', open)?;
    b.link(pick, ')', close)?;
    b.link(pick, Path::EOF, end)?;
    b.link(open, '(', pick)?;
    b.link(close, ')', pick)?;

    Ok(Grammar {
        graph: Arc::new(b.build(root, Some(end))?),
        matcher: RuneMatcher::with_pairs([('(', ')')]),
    })
}

/// `line -> expr EOF`，`expr -> a ('+' expr)?`
///
/// `expr` 节点持有全部 `+`，每个 `a` 是一个 `operand` 叶子。
/// 空输入不属于该语言，在 `operand` 处以 `EOF` 失败。
pub fn arith() -> Result<Grammar<ParseState<DemoKind>>, GraphError> {
    let line = || Element::new("line", DemoKind::Line);
    let expr = || Element::new("expr", DemoKind::Expr);
    let operand = || Element::new("operand", DemoKind::Operand);

    let mut b = ParseGraphBuilder::new();
    let line_open = b.add_state(ParseState::new(StateType::nonterminal(), line()))?;
    let expr_open = b.add_state(ParseState::new(StateType::nonterminal(), expr()))?;
    let operand_open = b.add_state(ParseState::new(
        StateType::nonterminal().emitting(),
        operand(),
    ))?;
    let operand_close = b.add_state(ParseState::new(
        StateType::terminal().emitting(),
        operand(),
    ))?;
    let expr_close = b.add_state(ParseState::new(StateType::terminal(), expr()))?;
    let line_end = b.add_state(ParseState::new(StateType::terminal(), line()))?;

    b.link(line_open, Path::Default, expr_open)?;
    b.link(expr_open, Path::Default, operand_open)?;
    b.link(operand_open, 'a', operand_close)?;
    b.link(operand_close, '+', operand_open)?;
    b.link(operand_close, Path::Default, expr_close)?;
    b.link(expr_close, Path::EOF, line_end)?;

    Ok(Grammar {
        graph: Arc::new(b.build(line_open, Some(line_end))?),
        matcher: RuneMatcher::new(),
    })
}
