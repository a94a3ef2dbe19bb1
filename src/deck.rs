//! 牌堆抽取器
//!
//! 每个分类一副洗好的下标队列，抽完再洗；避免同一句紧接着重复出现

use std::collections::{HashMap, VecDeque};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::{Quote, QuoteKey};

/// 每分类的牌堆与"上一次展示"记录
#[derive(Debug)]
pub struct DeckSelector<R> {
    decks: HashMap<String, VecDeque<usize>>,
    last_shown: HashMap<String, QuoteKey>,
    rng: R,
}

impl<R: Rng> DeckSelector<R> {
    pub fn new(rng: R) -> Self {
        Self {
            decks: HashMap::new(),
            last_shown: HashMap::new(),
            rng,
        }
    }

    /// 从 pool 中抽一句；pool 为空时返回 None
    pub fn draw<'a>(&mut self, category: &str, pool: &'a [Quote]) -> Option<&'a Quote> {
        let n = pool.len();
        if n == 0 {
            return None;
        }

        let deck = self.decks.entry(category.to_string()).or_default();
        // 库不可变，同一分类的 pool 大小不变；保险起见遇到越界下标就重洗
        if deck.is_empty() || deck.iter().any(|&i| i >= n) {
            let mut indices: Vec<usize> = (0..n).collect();
            indices.shuffle(&mut self.rng);
            *deck = VecDeque::from(indices);
        }

        let mut index = deck.pop_front()?;
        if n > 1
            && self.last_shown.get(category) == Some(&pool[index].key())
            && let Some(alternate) = deck.pop_front()
        {
            deck.push_back(index);
            index = alternate;
        }

        let chosen = &pool[index];
        self.last_shown.insert(category.to_string(), chosen.key());
        Some(chosen)
    }

    pub fn last_shown(&self, category: &str) -> Option<&QuoteKey> {
        self.last_shown.get(category)
    }

    /// 后端模式下记录展示结果
    pub fn record_shown(&mut self, category: &str, key: QuoteKey) {
        self.last_shown.insert(category.to_string(), key);
    }

    #[cfg(test)]
    fn remaining(&self, category: &str) -> usize {
        self.decks.get(category).map_or(0, VecDeque::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pool(n: usize) -> Vec<Quote> {
        (0..n)
            .map(|i| Quote {
                en: format!("quote {i}"),
                author: "someone".to_string(),
                ..Default::default()
            })
            .collect()
    }

    fn selector(seed: u64) -> DeckSelector<StdRng> {
        DeckSelector::new(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_empty_pool() {
        let mut deck = selector(1);
        assert!(deck.draw("X", &[]).is_none());
        assert!(deck.last_shown("X").is_none());
    }

    #[test]
    fn test_single_quote_repeats() {
        let mut deck = selector(2);
        let pool = pool(1);
        for _ in 0..5 {
            assert_eq!(deck.draw("X", &pool).unwrap().en, "quote 0");
        }
    }

    #[test]
    fn test_no_immediate_repeat() {
        for n in 2..8 {
            for seed in 0..20 {
                let mut deck = selector(seed);
                let pool = pool(n);
                let mut previous: Option<QuoteKey> = None;
                for _ in 0..1000 {
                    let key = deck.draw("X", &pool).unwrap().key();
                    assert_ne!(Some(&key), previous.as_ref(), "n={n} seed={seed}");
                    previous = Some(key);
                }
            }
        }
    }

    #[test]
    fn test_full_cycle_coverage() {
        for n in [2, 3, 5, 10] {
            let mut deck = selector(n as u64);
            let pool = pool(n);
            let drawn: Vec<String> = (0..1000)
                .map(|_| deck.draw("X", &pool).unwrap().en.clone())
                .collect();

            for window in drawn.windows(2 * n) {
                for quote in &pool {
                    assert!(window.contains(&quote.en), "n={n} missing {}", quote.en);
                }
            }
        }
    }

    #[test]
    fn test_first_cycle_is_permutation() {
        let mut deck = selector(7);
        let pool = pool(6);
        let mut seen: Vec<String> = (0..6)
            .map(|_| deck.draw("X", &pool).unwrap().en.clone())
            .collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_rejected_index_moves_to_tail() {
        let mut deck = selector(3);
        let pool = pool(3);
        deck.draw("X", &pool);
        deck.draw("X", &pool);
        let last = deck.draw("X", &pool).unwrap().key();
        assert_eq!(deck.remaining("X"), 0);

        // 强制新一轮的队首就是 last
        let last_index = pool.iter().position(|q| q.key() == last).unwrap();
        let forced = vec![last_index, (last_index + 1) % 3, (last_index + 2) % 3];
        deck.decks.insert("X".to_string(), VecDeque::from(forced));

        let next = deck.draw("X", &pool).unwrap().key();
        assert_ne!(next, last);
        assert_eq!(pool[(last_index + 1) % 3].key(), next);
        assert_eq!(deck.decks["X"].back(), Some(&last_index));
        assert_eq!(deck.remaining("X"), 2);
    }

    #[test]
    fn test_categories_are_independent() {
        let mut deck = selector(9);
        let pool = pool(4);
        let a = deck.draw("A", &pool).unwrap().key();
        assert_eq!(deck.last_shown("A"), Some(&a));
        assert!(deck.last_shown("B").is_none());
        deck.draw("B", &pool);
        assert_eq!(deck.remaining("A"), 3);
        assert_eq!(deck.remaining("B"), 3);
    }
}
