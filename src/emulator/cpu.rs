use std::collections::VecDeque;

use crate::assembler::types::JumpTable;
use crate::emulator::memory::{self, Memory};
use crate::types::*;

error_chain! {
    links {
        Memory(memory::Error, memory::ErrorKind);
    }

    errors {
        InboxEmpty {
            description("the inbox is empty")
            display("the inbox is empty")
        }
        AccumulatorEmpty {
            description("the accumulator is empty")
            display("the accumulator is empty")
        }
        IncompatibleTypes(op: Opcode, value: Value) {
            description("incompatible types")
            display("{} can't work with the letter '{}'", op, value)
        }
        NoSuchJumpDestination(dest: Destination) {
            description("no such jump destination")
            display("jump destination {} is not part of the program", dest)
        }
        Overflow(op: Opcode) {
            description("integer overflow")
            display("integer overflow in {}", op)
        }
        Halted {
            description("cpu halted")
            display("the program is not running")
        }
    }
}

/// Registers and memory of the office computer.
#[derive(Debug, Clone, Default)]
pub struct Cpu {
    /// `None` when no program is running.
    pub pc: Option<usize>,
    pub accumulator: Option<Value>,
    pub inbox: VecDeque<Value>,
    pub outbox: Vec<Value>,
    pub steps: u64,
    pub memory: Memory,
    pub halted: bool,
}

impl Cpu {
    pub fn new(memory: Memory) -> Cpu {
        Cpu {
            memory: memory,
            ..Default::default()
        }
    }

    pub fn set_inbox<I: IntoIterator<Item=Value>>(&mut self, inbox: I) {
        self.inbox = inbox.into_iter().collect();
    }

    /// Power on at step 0. Inbox and memory are left alone.
    pub fn reset(&mut self) {
        self.pc = Some(0);
        self.steps = 0;
        self.accumulator = None;
        self.outbox.clear();
        self.halted = false;
    }

    pub fn restart(&mut self, inbox: VecDeque<Value>, memory: Memory) {
        self.reset();
        self.inbox = inbox;
        self.memory = memory;
    }

    /// Execute the instruction at `pc`.
    ///
    /// On error nothing is counted and `pc` stays on the failing step.
    pub fn tick(&mut self, program: &[Instruction], jump_table: &JumpTable) -> Result<()> {
        let pc = match self.pc {
            Some(pc) if pc < program.len() && !self.halted => pc,
            _ => return Err(ErrorKind::Halted.into()),
        };
        let instruction = &program[pc];
        trace!("{:03}: {}", pc, instruction);

        let next = self.op(instruction, pc, program.len(), jump_table)?;
        self.pc = Some(next);
        self.steps += 1;
        Ok(())
    }

    fn op(&mut self,
          i: &Instruction,
          pc: usize,
          len: usize,
          jump_table: &JumpTable) -> Result<usize> {
        match *i {
            Instruction::NoOp => (),
            Instruction::MoveFromInbox => self.op_move_from_inbox()?,
            Instruction::MoveToOutbox => self.op_move_to_outbox()?,
            Instruction::CopyFrom(ref t) => self.op_copy_from(t)?,
            Instruction::CopyTo(ref t) => self.op_copy_to(t)?,
            Instruction::Add(ref t) => self.op_add(t)?,
            Instruction::Subtract(ref t) => self.op_subtract(t)?,
            Instruction::BumpUp(ref t) => self.op_bump(Opcode::BumpUp, t, 1)?,
            Instruction::BumpDown(ref t) => self.op_bump(Opcode::BumpDown, t, -1)?,
            Instruction::Jump(ref d) => return resolve_destination(d, jump_table, len),
            Instruction::JumpIfZero(ref d) => if self.acc()? == Value::Int(0) {
                return resolve_destination(d, jump_table, len);
            },
            Instruction::JumpIfNegative(ref d) => if self.acc_is_negative()? {
                return resolve_destination(d, jump_table, len);
            },
        }
        Ok(pc + 1)
    }

    fn acc(&self) -> Result<Value> {
        self.accumulator.ok_or_else(|| ErrorKind::AccumulatorEmpty.into())
    }

    fn acc_is_negative(&self) -> Result<bool> {
        let acc = self.acc()?;
        acc.as_int()
           .map(|i| i < 0)
           .ok_or_else(|| ErrorKind::IncompatibleTypes(Opcode::JumpIfNegative, acc).into())
    }

    fn op_move_from_inbox(&mut self) -> Result<()> {
        let value = self.inbox.pop_front().ok_or(ErrorKind::InboxEmpty)?;
        self.accumulator = Some(value);
        Ok(())
    }

    fn op_move_to_outbox(&mut self) -> Result<()> {
        let value = self.acc()?;
        self.outbox.push(value);
        self.accumulator = None;
        Ok(())
    }

    fn op_copy_from(&mut self, t: &Tile) -> Result<()> {
        let value = self.memory.get(&t.key, t.indirect)?;
        self.accumulator = Some(value);
        Ok(())
    }

    fn op_copy_to(&mut self, t: &Tile) -> Result<()> {
        let value = self.acc()?;
        self.memory.set(&t.key, value, t.indirect)?;
        Ok(())
    }

    fn op_add(&mut self, t: &Tile) -> Result<()> {
        let acc = self.acc()?;
        let operand = self.memory.get(&t.key, t.indirect)?;
        let sum = match (acc, operand) {
            (Value::Int(a), Value::Int(b)) =>
                a.checked_add(b).ok_or(ErrorKind::Overflow(Opcode::Add))?,
            (Value::Char(_), _) => return Err(ErrorKind::IncompatibleTypes(Opcode::Add, acc).into()),
            (_, c) => return Err(ErrorKind::IncompatibleTypes(Opcode::Add, c).into()),
        };
        self.accumulator = Some(Value::Int(sum));
        Ok(())
    }

    /// Two letters subtract as their code points; a letter and a number don't.
    fn op_subtract(&mut self, t: &Tile) -> Result<()> {
        let acc = self.acc()?;
        let operand = self.memory.get(&t.key, t.indirect)?;
        let (a, b) = match (acc, operand) {
            (Value::Int(a), Value::Int(b)) => (a, b),
            (Value::Char(a), Value::Char(b)) => (a as i64, b as i64),
            (Value::Char(_), _) => return Err(ErrorKind::IncompatibleTypes(Opcode::Subtract, acc).into()),
            (_, c) => return Err(ErrorKind::IncompatibleTypes(Opcode::Subtract, c).into()),
        };
        let diff = a.checked_sub(b).ok_or(ErrorKind::Overflow(Opcode::Subtract))?;
        self.accumulator = Some(Value::Int(diff));
        Ok(())
    }

    fn op_bump(&mut self, op: Opcode, t: &Tile, delta: i64) -> Result<()> {
        let value = match self.memory.get(&t.key, t.indirect)? {
            Value::Int(i) => i.checked_add(delta).ok_or(ErrorKind::Overflow(op))?,
            c => return Err(ErrorKind::IncompatibleTypes(op, c).into()),
        };
        self.memory.set(&t.key, Value::Int(value), t.indirect)?;
        self.accumulator = Some(Value::Int(value));
        Ok(())
    }
}

/// Step a jump would land on, checked against the program length.
pub fn resolve_destination(dest: &Destination,
                           jump_table: &JumpTable,
                           len: usize) -> Result<usize> {
    let step = match *dest {
        Destination::Step(s) => Some(s),
        Destination::Label(ref l) => jump_table.get(l),
    };
    match step {
        Some(s) if s < len => Ok(s),
        _ => Err(ErrorKind::NoSuchJumpDestination(dest.clone()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu() -> Cpu {
        let mut cpu = Cpu::default();
        cpu.set_inbox(vec![Value::Int(74)]);
        cpu.reset();
        cpu
    }

    fn run_one(cpu: &mut Cpu, i: Instruction) -> Result<()> {
        let program = vec![i, Instruction::NoOp, Instruction::NoOp];
        let mut jumps = JumpTable::new();
        jumps.insert("END", 2);
        cpu.tick(&program, &jumps)
    }

    fn set(cpu: &mut Cpu, tile: usize, value: Value) {
        cpu.memory.set(&TileRef::Index(tile), value, false).unwrap();
    }

    fn tile(i: usize) -> Tile {
        Tile::direct(i)
    }

    #[test]
    fn no_op() {
        let mut cpu = cpu();
        run_one(&mut cpu, Instruction::NoOp).unwrap();
        assert_eq!(cpu.pc, Some(1));
        assert_eq!(cpu.steps, 1);
    }

    #[test]
    fn move_from_inbox() {
        let mut cpu = cpu();
        run_one(&mut cpu, Instruction::MoveFromInbox).unwrap();
        assert_eq!(cpu.accumulator, Some(Value::Int(74)));
        assert!(cpu.inbox.is_empty());

        cpu.pc = Some(0);
        match run_one(&mut cpu, Instruction::MoveFromInbox) {
            Err(Error(ErrorKind::InboxEmpty, _)) => (),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(cpu.pc, Some(0));
        assert_eq!(cpu.steps, 1);
    }

    #[test]
    fn inbox_is_fifo() {
        let mut cpu = cpu();
        cpu.set_inbox(vec![Value::Int(1), Value::Int(2)]);
        run_one(&mut cpu, Instruction::MoveFromInbox).unwrap();
        assert_eq!(cpu.accumulator, Some(Value::Int(1)));
    }

    #[test]
    fn move_to_outbox() {
        let mut cpu = cpu();
        match run_one(&mut cpu, Instruction::MoveToOutbox) {
            Err(Error(ErrorKind::AccumulatorEmpty, _)) => (),
            other => panic!("unexpected {:?}", other),
        }
        cpu.accumulator = Some(Value::Char('A'));
        run_one(&mut cpu, Instruction::MoveToOutbox).unwrap();
        assert_eq!(cpu.accumulator, None);
        assert_eq!(cpu.outbox, vec![Value::Char('A')]);
        assert_eq!(cpu.steps, 1);
    }

    #[test]
    fn copy_from() {
        let mut cpu = cpu();
        match run_one(&mut cpu, Instruction::CopyFrom(tile(0))) {
            Err(Error(ErrorKind::Memory(memory::ErrorKind::TileEmpty(_)), _)) => (),
            other => panic!("unexpected {:?}", other),
        }
        set(&mut cpu, 0, Value::Int(74));
        run_one(&mut cpu, Instruction::CopyFrom(tile(0))).unwrap();
        assert_eq!(cpu.accumulator, Some(Value::Int(74)));
        assert_eq!(cpu.pc, Some(1));
    }

    #[test]
    fn copy_to() {
        let mut cpu = cpu();
        assert!(run_one(&mut cpu, Instruction::CopyTo(tile(0))).is_err());
        cpu.accumulator = Some(Value::Int(-5));
        run_one(&mut cpu, Instruction::CopyTo(tile(0))).unwrap();
        assert_eq!(cpu.memory.tile(0), Some(Value::Int(-5)));
        assert_eq!(cpu.accumulator, Some(Value::Int(-5)));
    }

    #[test]
    fn copy_to_unknown_label() {
        let mut cpu = cpu();
        cpu.accumulator = Some(Value::Int(1));
        match run_one(&mut cpu, Instruction::CopyTo(Tile::direct("nowhere"))) {
            Err(Error(ErrorKind::Memory(memory::ErrorKind::UnknownLabel(l)), _)) =>
                assert_eq!(l, "nowhere"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn add() {
        let mut cpu = cpu();
        set(&mut cpu, 0, Value::Int(4));
        cpu.accumulator = Some(Value::Int(3));
        run_one(&mut cpu, Instruction::Add(tile(0))).unwrap();
        assert_eq!(cpu.accumulator, Some(Value::Int(7)));
    }

    #[test]
    fn add_letter() {
        let mut cpu = cpu();
        set(&mut cpu, 0, Value::Char('A'));
        cpu.accumulator = Some(Value::Int(3));
        match run_one(&mut cpu, Instruction::Add(tile(0))) {
            Err(Error(ErrorKind::IncompatibleTypes(Opcode::Add, Value::Char('A')), _)) => (),
            other => panic!("unexpected {:?}", other),
        }
        cpu.accumulator = Some(Value::Char('B'));
        set(&mut cpu, 0, Value::Int(1));
        assert!(run_one(&mut cpu, Instruction::Add(tile(0))).is_err());
        assert_eq!(cpu.steps, 0);
    }

    #[test]
    fn add_overflow() {
        let mut cpu = cpu();
        set(&mut cpu, 0, Value::Int(i64::max_value()));
        cpu.accumulator = Some(Value::Int(1));
        match run_one(&mut cpu, Instruction::Add(tile(0))) {
            Err(Error(ErrorKind::Overflow(Opcode::Add), _)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn subtract() {
        let mut cpu = cpu();
        set(&mut cpu, 0, Value::Int(4));
        cpu.accumulator = Some(Value::Int(3));
        run_one(&mut cpu, Instruction::Subtract(tile(0))).unwrap();
        assert_eq!(cpu.accumulator, Some(Value::Int(-1)));
    }

    #[test]
    fn subtract_letters() {
        let mut cpu = cpu();
        set(&mut cpu, 0, Value::Char('A'));
        cpu.accumulator = Some(Value::Char('D'));
        run_one(&mut cpu, Instruction::Subtract(tile(0))).unwrap();
        assert_eq!(cpu.accumulator, Some(Value::Int(3)));

        cpu.accumulator = Some(Value::Int(3));
        cpu.pc = Some(0);
        match run_one(&mut cpu, Instruction::Subtract(tile(0))) {
            Err(Error(ErrorKind::IncompatibleTypes(Opcode::Subtract, _), _)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn bump() {
        let mut cpu = cpu();
        set(&mut cpu, 0, Value::Int(4));
        run_one(&mut cpu, Instruction::BumpUp(tile(0))).unwrap();
        assert_eq!(cpu.accumulator, Some(Value::Int(5)));
        assert_eq!(cpu.memory.tile(0), Some(Value::Int(5)));

        cpu.pc = Some(0);
        run_one(&mut cpu, Instruction::BumpDown(tile(0))).unwrap();
        cpu.pc = Some(0);
        run_one(&mut cpu, Instruction::BumpDown(tile(0))).unwrap();
        assert_eq!(cpu.accumulator, Some(Value::Int(3)));
        assert_eq!(cpu.steps, 3);
    }

    #[test]
    fn bump_indirect() {
        let mut cpu = cpu();
        set(&mut cpu, 0, Value::Int(5));
        set(&mut cpu, 5, Value::Int(9));
        run_one(&mut cpu, Instruction::BumpUp(Tile::indirect(0usize))).unwrap();
        assert_eq!(cpu.memory.tile(5), Some(Value::Int(10)));
        assert_eq!(cpu.memory.tile(0), Some(Value::Int(5)));
    }

    #[test]
    fn bump_letter() {
        let mut cpu = cpu();
        set(&mut cpu, 0, Value::Char('z'));
        match run_one(&mut cpu, Instruction::BumpDown(tile(0))) {
            Err(Error(ErrorKind::IncompatibleTypes(Opcode::BumpDown, _), _)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn jump() {
        let mut cpu = cpu();
        run_one(&mut cpu, Instruction::Jump(Destination::Label("END".into()))).unwrap();
        assert_eq!(cpu.pc, Some(2));
        cpu.pc = Some(0);
        run_one(&mut cpu, Instruction::Jump(Destination::Step(1))).unwrap();
        assert_eq!(cpu.pc, Some(1));
        assert_eq!(cpu.steps, 2);
    }

    #[test]
    fn jump_nowhere() {
        let mut cpu = cpu();
        match run_one(&mut cpu, Instruction::Jump(Destination::Label("LOST".into()))) {
            Err(Error(ErrorKind::NoSuchJumpDestination(_), _)) => (),
            other => panic!("unexpected {:?}", other),
        }
        match run_one(&mut cpu, Instruction::Jump(Destination::Step(3))) {
            Err(Error(ErrorKind::NoSuchJumpDestination(Destination::Step(3)), _)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn jump_if_zero() {
        let dest = Destination::Label("END".into());
        let mut cpu = cpu();
        assert!(run_one(&mut cpu, Instruction::JumpIfZero(dest.clone())).is_err());

        cpu.accumulator = Some(Value::Int(1));
        run_one(&mut cpu, Instruction::JumpIfZero(dest.clone())).unwrap();
        assert_eq!(cpu.pc, Some(1));

        cpu.pc = Some(0);
        cpu.accumulator = Some(Value::Int(0));
        run_one(&mut cpu, Instruction::JumpIfZero(dest)).unwrap();
        assert_eq!(cpu.pc, Some(2));
    }

    #[test]
    fn jump_if_negative() {
        let dest = Destination::Step(2);
        let mut cpu = cpu();
        cpu.accumulator = Some(Value::Int(0));
        run_one(&mut cpu, Instruction::JumpIfNegative(dest.clone())).unwrap();
        assert_eq!(cpu.pc, Some(1));

        cpu.pc = Some(0);
        cpu.accumulator = Some(Value::Int(-1));
        run_one(&mut cpu, Instruction::JumpIfNegative(dest.clone())).unwrap();
        assert_eq!(cpu.pc, Some(2));

        cpu.pc = Some(0);
        cpu.accumulator = Some(Value::Char('A'));
        assert!(run_one(&mut cpu, Instruction::JumpIfNegative(dest)).is_err());
    }

    #[test]
    fn late_bound_jumps() {
        let program = vec![Instruction::Jump(Destination::Label("X".into())),
                           Instruction::NoOp,
                           Instruction::NoOp];
        let mut jumps = JumpTable::new();
        jumps.insert("X", 1);
        let mut cpu = cpu();
        cpu.tick(&program, &jumps).unwrap();
        assert_eq!(cpu.pc, Some(1));

        jumps.insert("X", 2);
        cpu.pc = Some(0);
        cpu.tick(&program, &jumps).unwrap();
        assert_eq!(cpu.pc, Some(2));
    }

    #[test]
    fn halted() {
        let mut cpu = Cpu::default();
        match cpu.tick(&[Instruction::NoOp], &JumpTable::new()) {
            Err(Error(ErrorKind::Halted, _)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }
}
