//! 语法元素与元素树

use std::fmt;

use crate::kit::token::Token;

/// 语法元素：名称、声明的令牌类型，以及发射状态追加的令牌
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<K> {
    pub name: String,
    pub kind: K,
    pub tokens: Vec<Token<K>>,
}

impl<K> Element<K> {
    pub fn new(name: impl Into<String>, kind: K) -> Self {
        Self {
            name: name.into(),
            kind,
            tokens: Vec::new(),
        }
    }

    /// 各令牌的词素
    pub fn lexemes(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.lexeme.as_str()).collect()
    }
}

/// 元素树节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTree<K> {
    pub element: Element<K>,
    pub children: Vec<ElementTree<K>>,
}

impl<K> ElementTree<K> {
    pub fn new(element: Element<K>) -> Self {
        Self {
            element,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.element.name
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// 子树中的节点总数（含自身）
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(ElementTree::size).sum::<usize>()
    }

    /// 树高，叶子为 1
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ElementTree::depth)
            .max()
            .unwrap_or(0)
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.element.name, indent = level * 2)?;
        for token in &self.element.tokens {
            write!(f, " {token}")?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_indented(f, level + 1)?;
        }
        Ok(())
    }
}

/// 每行一个节点，子节点缩进两格
impl<K> fmt::Display for ElementTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
