//! 협력형 태스크 큐.
//!
//! 단조 증가 밀리초 시계를 기준으로 취소 가능한 일회성 타이머와
//! 유휴(idle) 콜백을 보관한다. 실행은 호출자가 `pop_ready`로 꺼내서 한다.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::Duration;

/// 예약된 태스크 식별자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// 타이머 + 유휴 큐
#[derive(Debug)]
pub struct TaskQueue<T> {
    next_id: u64,
    /// (만료 시각, id) 순으로 정렬된 타이머
    timers: BTreeMap<(u64, TaskId), T>,
    /// id → 만료 시각 (취소용)
    deadlines: HashMap<TaskId, u64>,
    idle: VecDeque<(TaskId, T)>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            timers: BTreeMap::new(),
            deadlines: HashMap::new(),
            idle: VecDeque::new(),
        }
    }

    fn allocate_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }

    /// `now_ms + delay` 에 만료되는 일회성 타이머 등록
    pub fn add_timer(&mut self, now_ms: u64, delay: Duration, task: T) -> TaskId {
        let id = self.allocate_id();
        let due = now_ms.saturating_add(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX));
        self.timers.insert((due, id), task);
        self.deadlines.insert(id, due);
        id
    }

    /// 다음 유휴 차례에 실행될 콜백 등록
    pub fn add_idle(&mut self, task: T) -> TaskId {
        let id = self.allocate_id();
        self.idle.push_back((id, task));
        id
    }

    /// 예약 취소 (이미 실행됐거나 없는 id면 false)
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if let Some(due) = self.deadlines.remove(&id) {
            return self.timers.remove(&(due, id)).is_some();
        }
        match self.idle.iter().position(|(idle_id, _)| *idle_id == id) {
            Some(index) => self.idle.remove(index).is_some(),
            None => false,
        }
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.deadlines.contains_key(&id) || self.idle.iter().any(|(idle_id, _)| *idle_id == id)
    }

    /// 실행할 태스크 하나 꺼내기
    ///
    /// 만료된 타이머를 만료 순서대로 먼저 내주고, 만료된 타이머가 없을 때만
    /// 유휴 콜백을 내준다.
    pub fn pop_ready(&mut self, now_ms: u64) -> Option<T> {
        let due_key = self
            .timers
            .keys()
            .next()
            .copied()
            .filter(|(due, _)| *due <= now_ms);

        if let Some(key) = due_key {
            self.deadlines.remove(&key.1);
            return self.timers.remove(&key);
        }
        self.idle.pop_front().map(|(_, task)| task)
    }

    /// 다음으로 깨어나야 할 시각 (유휴 콜백이 있으면 0 = 즉시)
    pub fn next_deadline(&self) -> Option<u64> {
        if !self.idle.is_empty() {
            return Some(0);
        }
        self.timers.keys().next().map(|(due, _)| *due)
    }

    /// 예약된 태스크 (타이머는 만료 순서, 그다음 유휴 콜백)
    pub fn pending(&self) -> impl Iterator<Item = &T> {
        self.timers
            .values()
            .chain(self.idle.iter().map(|(_, task)| task))
    }

    /// 예약된 태스크 수
    pub fn len(&self) -> usize {
        self.timers.len() + self.idle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
