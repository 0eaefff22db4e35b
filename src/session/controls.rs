//! 字段控制存储
//!
//! 按文件序号保存分析结果：有序字段列表 + 每个字段的控制项。
//! 没有记录即"尚未处理"。

use std::collections::{HashMap, HashSet};

use crate::error::{AppResult, SessionError};
use crate::models::{FieldControl, SelectedField, Treatment};

/// 单个文件的分析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRecord {
    fields: Vec<String>,
    controls: HashMap<String, FieldControl>,
}

impl AnalysisRecord {
    /// 表格 / 文档 / 音频：丢弃第一个字段（标识列），其余默认 `{visible, none, ""}`
    pub fn from_columns(headers: Vec<String>) -> Self {
        Self::build(headers.into_iter().skip(1), FieldControl::for_column)
    }

    /// 图片：每个实体默认 `{visible, mask, ""}`
    pub fn from_entities(entities: Vec<String>) -> Self {
        Self::build(entities.into_iter(), FieldControl::for_entity)
    }

    // 重复的 key 只保留第一次出现
    fn build(keys: impl Iterator<Item = String>, default: fn() -> FieldControl) -> Self {
        let mut seen = HashSet::new();
        let mut fields = Vec::new();
        let mut controls = HashMap::new();
        for key in keys {
            if seen.insert(key.clone()) {
                controls.insert(key.clone(), default());
                fields.push(key);
            }
        }
        Self { fields, controls }
    }

    /// 有序字段列表
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn control(&self, key: &str) -> Option<&FieldControl> {
        self.controls.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ColumnControlStore {
    records: HashMap<usize, AnalysisRecord>,
}

impl ColumnControlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入（或覆盖）某个文件的分析结果
    pub fn insert(&mut self, index: usize, record: AnalysisRecord) {
        self.records.insert(index, record);
    }

    pub fn record(&self, index: usize) -> Option<&AnalysisRecord> {
        self.records.get(&index)
    }

    pub fn is_processed(&self, index: usize) -> bool {
        self.records.contains_key(&index)
    }

    /// 翻转单个字段的可见性
    pub fn toggle_visibility(&mut self, index: usize, key: &str) -> AppResult<bool> {
        let control = self.control_mut(index, key)?;
        control.visible = !control.visible;
        Ok(control.visible)
    }

    /// 设置处理方式，覆盖之前的选择
    pub fn set_treatment(&mut self, index: usize, key: &str, treatment: Treatment) -> AppResult<()> {
        self.control_mut(index, key)?.treatment = treatment;
        Ok(())
    }

    /// 设置提示词，不做校验
    pub fn set_prompt(&mut self, index: usize, key: &str, text: impl Into<String>) -> AppResult<()> {
        self.control_mut(index, key)?.prompt = text.into();
        Ok(())
    }

    /// 可见字段的 `{name, mode, prompt}` 列表，按字段顺序
    ///
    /// 没有分析结果的文件返回空列表。
    pub fn selected_for(&self, index: usize) -> Vec<SelectedField> {
        let Some(record) = self.records.get(&index) else {
            return Vec::new();
        };
        record
            .fields
            .iter()
            .filter_map(|key| {
                record
                    .controls
                    .get(key)
                    .filter(|c| c.visible)
                    .map(|c| SelectedField::new(key, c))
            })
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    fn control_mut(&mut self, index: usize, key: &str) -> AppResult<&mut FieldControl> {
        self.records
            .get_mut(&index)
            .and_then(|r| r.controls.get_mut(key))
            .ok_or_else(|| {
                SessionError::UnknownField {
                    index,
                    key: key.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn store_with_columns() -> ColumnControlStore {
        let mut store = ColumnControlStore::new();
        store.insert(0, AnalysisRecord::from_columns(strings(&["id", "a", "b", "c"])));
        store.insert(1, AnalysisRecord::from_columns(strings(&["id", "a", "x"])));
        store
    }

    #[test]
    fn test_columns_drop_identifier() {
        let record = AnalysisRecord::from_columns(strings(&["id", "a", "b", "c"]));
        assert_eq!(record.fields(), &strings(&["a", "b", "c"])[..]);
        assert!(record.control("id").is_none());
        for key in ["a", "b", "c"] {
            assert_eq!(record.control(key), Some(&FieldControl::for_column()));
        }
    }

    #[test]
    fn test_entities_default_to_mask() {
        let record = AnalysisRecord::from_entities(strings(&["E1", "E2"]));
        assert_eq!(record.len(), 2);
        for key in ["E1", "E2"] {
            let control = record.control(key).unwrap();
            assert!(control.visible);
            assert_eq!(control.treatment, Treatment::Mask);
            assert_eq!(control.prompt, "");
        }
    }

    #[test]
    fn test_duplicate_keys_kept_once() {
        let record = AnalysisRecord::from_entities(strings(&["PERSON", "EMAIL", "PERSON"]));
        assert_eq!(record.fields(), &strings(&["PERSON", "EMAIL"])[..]);
    }

    #[test]
    fn test_toggle_twice_restores_and_isolates() {
        let mut store = store_with_columns();
        let before_b = store.record(0).unwrap().control("b").cloned();
        let before_other = store.record(1).unwrap().clone();

        assert!(!store.toggle_visibility(0, "a").unwrap());
        assert_eq!(store.record(0).unwrap().control("b").cloned(), before_b);
        assert!(store.toggle_visibility(0, "a").unwrap());

        assert_eq!(
            store.record(0).unwrap().control("a"),
            Some(&FieldControl::for_column())
        );
        assert_eq!(store.record(0).unwrap().control("b").cloned(), before_b);
        assert_eq!(store.record(1).unwrap(), &before_other);
    }

    #[test]
    fn test_treatment_single_slot() {
        let mut store = store_with_columns();
        store.set_treatment(0, "a", Treatment::Mask).unwrap();
        store.set_treatment(0, "a", Treatment::Obfuscate).unwrap();
        assert_eq!(
            store.record(0).unwrap().control("a").unwrap().treatment,
            Treatment::Obfuscate
        );
        store.set_treatment(0, "a", Treatment::None).unwrap();
        assert_eq!(
            store.record(0).unwrap().control("a").unwrap().treatment,
            Treatment::None
        );
    }

    #[test]
    fn test_selected_for_only_visible() {
        let mut store = store_with_columns();
        store.toggle_visibility(0, "b").unwrap();
        store.set_treatment(0, "c", Treatment::Obfuscate).unwrap();
        store.set_prompt(0, "c", "use fake cities").unwrap();

        let selected = store.selected_for(0);
        let names: Vec<&str> = selected.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(selected[0].treatment, None);
        assert_eq!(selected[1].treatment.as_deref(), Some("obfuscate"));
        assert_eq!(selected[1].prompt, "use fake cities");
    }

    #[test]
    fn test_unknown_field_and_unprocessed_file() {
        let mut store = store_with_columns();
        assert!(store.toggle_visibility(0, "id").is_err());
        assert!(store.set_prompt(7, "a", "x").is_err());
        assert!(store.selected_for(7).is_empty());
        assert!(!store.is_processed(7));
    }
}
