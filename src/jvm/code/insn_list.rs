use super::{Instruction, Label};
use std::collections::HashSet;
use std::ops::Index;
use std::slice;

/// Ordered sequence of instructions making up a method body
///
/// Insertion order is execution order. This deliberately does not implement `Clone`: copying a
/// body must give the copy its own labels, which is what
/// [`clone_instructions`](crate::jvm::cloner::clone_instructions) does.
#[derive(Debug, Default, PartialEq)]
pub struct InsnList(Vec<Instruction>);

impl InsnList {
    pub fn new() -> InsnList {
        InsnList(vec![])
    }

    /// Append an instruction to the end of the list
    pub fn add(&mut self, insn: Instruction) {
        self.0.push(insn);
    }

    /// Insert an instruction before the one currently at `index`
    pub fn insert(&mut self, index: usize, insn: Instruction) {
        self.0.insert(index, insn);
    }

    /// Remove the instruction at `index`
    pub fn remove(&mut self, index: usize) -> Instruction {
        self.0.remove(index)
    }

    /// Append every instruction of `other`, leaving it empty
    pub fn append(&mut self, other: &mut InsnList) {
        self.0.append(&mut other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.0.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Instruction> {
        self.0.get_mut(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Instruction> {
        self.0.iter()
    }

    /// Labels placed in the list, in order of placement
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.0.iter().filter_map(|insn| match insn {
            Instruction::Label(label) => Some(*label),
            _ => None,
        })
    }

    /// Is the label placed somewhere in this list?
    pub fn contains_label(&self, label: Label) -> bool {
        self.labels().any(|placed| placed == label)
    }

    /// Labels referenced by instructions in the list but never placed in it
    pub fn dangling_labels(&self) -> Vec<Label> {
        let placed: HashSet<Label> = self.labels().collect();
        let mut seen = HashSet::new();
        self.0
            .iter()
            .flat_map(Instruction::referenced_labels)
            .filter(|label| !placed.contains(label) && seen.insert(*label))
            .collect()
    }
}

impl Index<usize> for InsnList {
    type Output = Instruction;

    fn index(&self, index: usize) -> &Instruction {
        &self.0[index]
    }
}

impl From<Vec<Instruction>> for InsnList {
    fn from(insns: Vec<Instruction>) -> InsnList {
        InsnList(insns)
    }
}

impl FromIterator<Instruction> for InsnList {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> InsnList {
        InsnList(iter.into_iter().collect())
    }
}

impl Extend<Instruction> for InsnList {
    fn extend<I: IntoIterator<Item = Instruction>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl IntoIterator for InsnList {
    type Item = Instruction;
    type IntoIter = std::vec::IntoIter<Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a InsnList {
    type Item = &'a Instruction;
    type IntoIter = slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
