//! Script execution stack.

use crate::error::ScriptError;

use super::scriptnum::ScriptNumber;

/// Maximum byte length of a numeric operand.
pub(crate) const MAX_NUM_LENGTH: usize = 4;

/// Convert a byte array to a boolean (Bitcoin consensus rules).
///
/// Any non-zero byte makes the value true, except that negative zero
/// (all zero bytes with only the sign bit set on the last) is false.
pub fn as_bool(t: &[u8]) -> bool {
    for i in 0..t.len() {
        if t[i] != 0 {
            if i == t.len() - 1 && t[i] == 0x80 {
                return false;
            }
            return true;
        }
    }
    false
}

/// Convert a boolean to its canonical byte encoding.
pub fn from_bool(v: bool) -> Vec<u8> {
    if v {
        vec![1]
    } else {
        vec![]
    }
}

/// A stack of byte strings, used for both the data and alt stacks.
#[derive(Debug, Default, Clone)]
pub struct Stack {
    stk: Vec<Vec<u8>>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { stk: Vec::new() }
    }

    pub fn depth(&self) -> i32 {
        self.stk.len() as i32
    }

    pub fn push_byte_array(&mut self, data: Vec<u8>) {
        self.stk.push(data);
    }

    pub fn push_int(&mut self, n: &ScriptNumber) {
        self.push_byte_array(n.to_bytes());
    }

    pub fn push_bool(&mut self, val: bool) {
        self.push_byte_array(from_bool(val));
    }

    pub fn pop_byte_array(&mut self) -> Result<Vec<u8>, ScriptError> {
        self.nip_n(0)
    }

    /// Pop a numeric operand (at most 4 bytes).
    pub fn pop_int(&mut self) -> Result<ScriptNumber, ScriptError> {
        let data = self.pop_byte_array()?;
        ScriptNumber::from_bytes(&data, MAX_NUM_LENGTH, false)
    }

    pub fn pop_bool(&mut self) -> Result<bool, ScriptError> {
        let data = self.pop_byte_array()?;
        Ok(as_bool(&data))
    }

    /// Copy the item `idx` entries down from the top (0 = top).
    pub fn peek_byte_array(&self, idx: i32) -> Result<Vec<u8>, ScriptError> {
        let sz = self.stk.len() as i32;
        if idx < 0 || idx >= sz {
            return Err(ScriptError::StackError(format!(
                "index {} is invalid for stack size {}",
                idx, sz
            )));
        }
        Ok(self.stk[(sz - idx - 1) as usize].clone())
    }

    pub fn peek_int(&self, idx: i32) -> Result<ScriptNumber, ScriptError> {
        let data = self.peek_byte_array(idx)?;
        ScriptNumber::from_bytes(&data, MAX_NUM_LENGTH, false)
    }

    pub fn peek_bool(&self, idx: i32) -> Result<bool, ScriptError> {
        let data = self.peek_byte_array(idx)?;
        Ok(as_bool(&data))
    }

    /// Remove and return the item `idx` entries down from the top.
    fn nip_n(&mut self, idx: i32) -> Result<Vec<u8>, ScriptError> {
        let sz = self.stk.len() as i32;
        if idx < 0 || idx > sz - 1 {
            return Err(ScriptError::StackError(format!(
                "index {} is invalid for stack size {}",
                idx, sz
            )));
        }
        let pos = (sz - idx - 1) as usize;
        Ok(self.stk.remove(pos))
    }

    pub fn nip_n_discard(&mut self, idx: i32) -> Result<(), ScriptError> {
        self.nip_n(idx)?;
        Ok(())
    }

    pub fn tuck(&mut self) -> Result<(), ScriptError> {
        let so2 = self.pop_byte_array()?;
        let so1 = self.pop_byte_array()?;
        self.push_byte_array(so2.clone());
        self.push_byte_array(so1);
        self.push_byte_array(so2);
        Ok(())
    }

    pub fn drop_n(&mut self, n: i32) -> Result<(), ScriptError> {
        if n < 1 {
            return Err(ScriptError::StackError(format!(
                "attempt to drop {} items from stack",
                n
            )));
        }
        for _ in 0..n {
            self.pop_byte_array()?;
        }
        Ok(())
    }

    pub fn dup_n(&mut self, n: i32) -> Result<(), ScriptError> {
        if n < 1 {
            return Err(ScriptError::StackError(format!(
                "attempt to dup {} stack items",
                n
            )));
        }
        for _ in (0..n).rev() {
            let so = self.peek_byte_array(n - 1)?;
            self.push_byte_array(so);
        }
        Ok(())
    }

    pub fn rot_n(&mut self, n: i32) -> Result<(), ScriptError> {
        if n < 1 {
            return Err(ScriptError::StackError(format!(
                "attempt to rotate {} stack items",
                n
            )));
        }
        let entry = 3 * n - 1;
        for _ in (0..n).rev() {
            let so = self.nip_n(entry)?;
            self.push_byte_array(so);
        }
        Ok(())
    }

    pub fn swap_n(&mut self, n: i32) -> Result<(), ScriptError> {
        if n < 1 {
            return Err(ScriptError::StackError(format!(
                "attempt to swap {} stack items",
                n
            )));
        }
        let entry = 2 * n - 1;
        for _ in (0..n).rev() {
            let so = self.nip_n(entry)?;
            self.push_byte_array(so);
        }
        Ok(())
    }

    pub fn over_n(&mut self, n: i32) -> Result<(), ScriptError> {
        if n < 1 {
            return Err(ScriptError::StackError(format!(
                "attempt to perform over on {} stack items",
                n
            )));
        }
        let entry = 2 * n - 1;
        for _ in (0..n).rev() {
            let so = self.peek_byte_array(entry)?;
            self.push_byte_array(so);
        }
        Ok(())
    }

    pub fn pick_n(&mut self, n: i32) -> Result<(), ScriptError> {
        let so = self.peek_byte_array(n)?;
        self.push_byte_array(so);
        Ok(())
    }

    pub fn roll_n(&mut self, n: i32) -> Result<(), ScriptError> {
        let so = self.nip_n(n)?;
        self.push_byte_array(so);
        Ok(())
    }

    /// Stack contents bottom to top.
    pub fn items(&self) -> &[Vec<u8>] {
        &self.stk
    }

    pub fn clear(&mut self) {
        self.stk.clear();
    }
}
