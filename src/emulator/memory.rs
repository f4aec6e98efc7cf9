//! The floor of the office: numbered tiles, some of them labeled.
//!
//! Tiles are sparse. A tile that was never written is empty, which is not
//! the same thing as holding `0`. Any number of labels can point at the same
//! tile, and labels and numbers can be used interchangeably:
//!
//! ```
//! use hrm::emulator::memory::Memory;
//! use hrm::types::{TileRef, Value};
//!
//! let mut memory = Memory::new();
//! memory.label_tile(&TileRef::Index(5), "hello").unwrap();
//! memory.set(&TileRef::from("hello"), Value::Int(74), false).unwrap();
//! assert_eq!(memory.get(&TileRef::Index(5), false).unwrap(), Value::Int(74));
//! ```

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::types::{TileRef, Value};

error_chain! {
    errors {
        TileEmpty(tile: String) {
            description("tile is empty")
            display("tile {} is empty", tile)
        }
        UnknownLabel(label: String) {
            description("unknown label")
            display("the label \"{}\" has not been applied to any tile", label)
        }
        CannotIndirectThroughCharacter(c: char) {
            description("cannot indirect through a character")
            display("'{}' is a letter, it can't be used as a tile index", c)
        }
        CannotStoreInvalidType(raw: String) {
            description("only integers and single characters can be stored")
            display("\"{}\" is neither an integer nor a single character", raw)
        }
        InvalidTileIndex(i: i64) {
            description("invalid tile index")
            display("{} is not a valid tile index", i)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    tiles: BTreeMap<usize, Value>,
    labels: BTreeMap<String, usize>,
}

impl Memory {
    pub fn new() -> Memory {
        Memory::default()
    }

    /// Labels are applied before values, so `values` may be keyed by label.
    pub fn with_layout(labels: &BTreeMap<String, usize>,
                       values: &BTreeMap<String, Value>) -> Result<Memory> {
        let mut memory = Memory::new();
        for (label, &index) in labels {
            memory.labels.insert(label.clone(), index);
        }
        for (key, &value) in values {
            memory.set(&TileRef::from(key.as_str()), value, false)?;
        }
        Ok(memory)
    }

    pub fn resolve(&self, key: &TileRef) -> Result<usize> {
        match *key {
            TileRef::Index(i) => Ok(i),
            TileRef::Label(ref l) => {
                // Numbers that didn't fit an index are negative, not labels.
                if let Ok(i) = l.parse::<i64>() {
                    return Err(ErrorKind::InvalidTileIndex(i).into());
                }
                self.labels
                    .get(l)
                    .cloned()
                    .ok_or_else(|| ErrorKind::UnknownLabel(l.clone()).into())
            }
        }
    }

    pub fn label_tile(&mut self, key: &TileRef, label: &str) -> Result<()> {
        let index = self.resolve(key)?;
        self.labels.insert(label.into(), index);
        Ok(())
    }

    pub fn get(&self, key: &TileRef, indirect: bool) -> Result<Value> {
        let index = self.resolve(key)?;
        let value = self.fetch(index)?;
        if indirect {
            self.fetch(pointer(value)?)
        } else {
            Ok(value)
        }
    }

    pub fn set(&mut self, key: &TileRef, value: Value, indirect: bool) -> Result<()> {
        let mut index = self.resolve(key)?;
        if indirect {
            index = pointer(self.fetch(index)?)?;
        }
        self.tiles.insert(index, value);
        Ok(())
    }

    /// Raw tile content, `None` when empty.
    pub fn tile(&self, index: usize) -> Option<Value> {
        self.tiles.get(&index).cloned()
    }

    pub fn clear_tile(&mut self, key: &TileRef) -> Result<Option<Value>> {
        let index = self.resolve(key)?;
        Ok(self.tiles.remove(&index))
    }

    pub fn tiles(&self) -> btree_map::Iter<usize, Value> {
        self.tiles.iter()
    }

    pub fn labels(&self) -> btree_map::Iter<String, usize> {
        self.labels.iter()
    }

    pub fn labels_of(&self, index: usize) -> Vec<&str> {
        self.labels
            .iter()
            .filter(|&(_, &i)| i == index)
            .map(|(l, _)| l.as_str())
            .collect()
    }

    fn fetch(&self, index: usize) -> Result<Value> {
        self.tile(index)
            .ok_or_else(|| ErrorKind::TileEmpty(index.to_string()).into())
    }
}

fn pointer(value: Value) -> Result<usize> {
    match value {
        Value::Char(c) => Err(ErrorKind::CannotIndirectThroughCharacter(c).into()),
        Value::Int(i) if i < 0 => Err(ErrorKind::InvalidTileIndex(i).into()),
        Value::Int(i) => Ok(i as usize),
    }
}

/// Starting state of a puzzle: memory layout plus the inbox.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Floor {
    pub labels: BTreeMap<String, usize>,
    pub values: BTreeMap<String, Value>,
    pub inbox: Vec<Value>,
}

impl Floor {
    pub fn memory(&self) -> Result<Memory> {
        Memory::with_layout(&self.labels, &self.values)
    }
}
