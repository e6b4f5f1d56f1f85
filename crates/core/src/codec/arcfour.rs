//! Arcfour (RC4) stream cipher.
//!
//! Used by the Standard Security Handler both for key scheduling (the O and
//! U entries) and for encrypting string and stream payloads in revisions 2
//! and 3. Keys are 1-256 bytes; PDF keys are at most 16.

/// RC4 keystream state.
#[derive(Clone)]
pub struct Arcfour {
    state: [u8; 256],
    i: u8,
    j: u8,
}

impl Arcfour {
    /// Create a cipher from `key`.
    ///
    /// # Panics
    /// Panics if `key` is empty or longer than 256 bytes. Callers in this
    /// crate only pass digests truncated to 5-16 bytes.
    pub fn new(key: &[u8]) -> Self {
        assert!(
            !key.is_empty() && key.len() <= 256,
            "RC4 key must be 1-256 bytes"
        );

        let mut state: [u8; 256] = std::array::from_fn(|i| i as u8);

        // Key-scheduling algorithm (KSA)
        let mut j: u8 = 0;
        for i in 0..256 {
            j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
            state.swap(i, j as usize);
        }

        Self { state, i: 0, j: 0 }
    }

    /// Run `data` through a fresh cipher keyed with `key`.
    ///
    /// Every PDF string or stream is encrypted from the start of the
    /// keystream, so this is the form the security handler uses.
    pub fn oneshot(key: &[u8], data: &[u8]) -> Vec<u8> {
        Self::new(key).process(data)
    }

    /// Encrypt/decrypt data, continuing the current keystream.
    pub fn process(&mut self, data: &[u8]) -> Vec<u8> {
        let mut out = data.to_vec();
        self.apply_keystream(&mut out);
        out
    }

    /// XOR the keystream into `buf` in place.
    pub fn apply_keystream(&mut self, buf: &mut [u8]) {
        for byte in buf.iter_mut() {
            *byte ^= self.prga();
        }
    }

    /// Pseudo-random generation algorithm (PRGA).
    fn prga(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.state[self.i as usize]);
        self.state.swap(self.i as usize, self.j as usize);

        let idx = self.state[self.i as usize].wrapping_add(self.state[self.j as usize]);
        self.state[idx as usize]
    }
}

impl std::fmt::Debug for Arcfour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arcfour").finish_non_exhaustive()
    }
}
