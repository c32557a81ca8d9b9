//! 成对符号匹配器
//!
//! 对称配对表 + 后进先出栈。配对表是结构性的（注册后不变），
//! 栈是动态的，`reset` 只清空栈，所以同一个匹配器可以在多次运行间复用。

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct RuneMatcher {
    pairs: HashMap<char, char>,
    stack: Vec<char>,
}

impl RuneMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用一组配对创建匹配器
    pub fn with_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (char, char)>,
    {
        let mut matcher = Self::new();
        for (a, b) in pairs {
            matcher.register(a, b);
        }
        matcher
    }

    /// 注册一对可互相闭合的字符（对称，幂等）
    pub fn register(&mut self, a: char, b: char) {
        self.pairs.insert(a, b);
        self.pairs.insert(b, a);
    }

    pub fn is_registered(&self, r: char) -> bool {
        self.pairs.contains_key(&r)
    }

    /// `r` 的配对字符
    pub fn partner(&self, r: char) -> Option<char> {
        self.pairs.get(&r).copied()
    }

    /// 压栈；未注册的字符不入栈并返回 false
    pub fn store(&mut self, r: char) -> bool {
        if !self.is_registered(r) {
            return false;
        }
        self.stack.push(r);
        true
    }

    /// 与栈顶匹配，成功则弹栈；失败时不修改状态
    pub fn matches(&mut self, r: char) -> bool {
        let Some(&top) = self.stack.last() else {
            return false;
        };
        if self.partner(r) != Some(top) {
            return false;
        }
        self.stack.pop();
        true
    }

    /// 栈为空即为已匹配
    pub fn is_matched(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// 清空栈，保留配对表
    pub fn reset(&mut self) {
        self.stack.clear();
    }
}
