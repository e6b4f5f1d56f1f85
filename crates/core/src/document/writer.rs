//! Document-level save: header, trailer bookkeeping and encryption wiring.

use std::io::Write;

use tracing::debug;

use super::file_id::{file_id_array, generate_file_id};
use super::options::{PdfVersion, WriterOptions};
use crate::model::{Dictionary, ObjectRef, PdfObject, PdfWriter};
use crate::security::{
    FILE_ID_LEN, ObjectCipher, ObjectKey, StandardSecurityHandler, encrypt_dictionary,
};
use crate::xref::XrefChain;
use crate::{PdfError, Result};

/// An in-memory document: the object graph, its xref sections and the
/// optional security handler.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    version: PdfVersion,
    xref: XrefChain,
    root: Option<ObjectRef>,
    info: Option<ObjectRef>,
    file_id: Option<[u8; FILE_ID_LEN]>,
    security: Option<StandardSecurityHandler>,
    encrypt_ref: Option<ObjectRef>,
    /// Total output length after the last save; base offset for updates.
    saved_len: Option<u64>,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    pub fn new() -> Self {
        Self::with_options(WriterOptions::default())
    }

    pub fn with_options(options: WriterOptions) -> Self {
        Self {
            version: options.version,
            xref: XrefChain::with_capacity_limit(options.max_xref_entries),
            root: None,
            info: None,
            file_id: None,
            security: None,
            encrypt_ref: None,
            saved_len: None,
        }
    }

    pub const fn version(&self) -> PdfVersion {
        self.version
    }

    pub fn set_version(&mut self, version: PdfVersion) {
        self.version = version;
    }

    pub const fn xref(&self) -> &XrefChain {
        &self.xref
    }

    /// Register an indirect object.
    pub fn add(&mut self, object: impl Into<PdfObject>) -> Result<ObjectRef> {
        self.xref.add(object.into())
    }

    pub fn object(&self, id: ObjectRef) -> Option<&PdfObject> {
        self.xref.object(id)
    }

    pub fn object_mut(&mut self, id: ObjectRef) -> Option<&mut PdfObject> {
        self.xref.object_mut(id)
    }

    /// Dictionary (or stream dictionary) registered under `id`.
    pub fn dict_mut(&mut self, id: ObjectRef) -> Result<&mut Dictionary> {
        self.xref
            .object_mut(id)
            .and_then(PdfObject::as_dict_mut)
            .ok_or_else(|| PdfError::InvalidArgument(format!("{id} is not a dictionary")))
    }

    /// Set the document catalog referenced by the trailer /Root.
    pub fn set_root(&mut self, root: ObjectRef) {
        self.root = Some(root);
    }

    pub fn set_info(&mut self, info: ObjectRef) {
        self.info = Some(info);
    }

    pub const fn root(&self) -> Option<ObjectRef> {
        self.root
    }

    pub const fn info(&self) -> Option<ObjectRef> {
        self.info
    }

    /// Use a fixed file identifier instead of generating one at save time.
    pub fn set_file_id(&mut self, file_id: [u8; FILE_ID_LEN]) {
        self.file_id = Some(file_id);
    }

    pub const fn file_id(&self) -> Option<&[u8; FILE_ID_LEN]> {
        self.file_id.as_ref()
    }

    /// Encrypt the document with `handler` on save.
    ///
    /// Registers the /Encrypt dictionary slot on first use and raises the
    /// header version to what the revision requires.
    pub fn set_encryption(&mut self, handler: StandardSecurityHandler) -> Result<()> {
        if self.encrypt_ref.is_none() {
            self.encrypt_ref = Some(self.xref.add(PdfObject::Dict(Dictionary::new()))?);
        }
        self.version = self.version.max(handler.mode().min_pdf_version());
        self.security = Some(handler);
        Ok(())
    }

    pub const fn is_encrypted(&self) -> bool {
        self.security.is_some()
    }

    pub const fn security(&self) -> Option<&StandardSecurityHandler> {
        self.security.as_ref()
    }

    /// Reference of the /Encrypt dictionary, once encryption is set.
    pub const fn encrypt_ref(&self) -> Option<ObjectRef> {
        self.encrypt_ref
    }

    /// Write the complete file. Returns the number of bytes written.
    pub fn save<W: Write>(&mut self, writer: W) -> Result<u64> {
        self.prepare_save()?;

        let mut out = PdfWriter::new(writer);
        out.write_bytes(&self.version.header())?;

        let cipher = DocumentCipher::new(self.security.as_ref(), self.encrypt_ref);
        self.xref
            .write_to(&mut out, cipher.as_ref().map(|c| c as &dyn ObjectCipher))?;
        out.flush()?;

        let len = out.position();
        self.saved_len = Some(len);
        debug!(
            bytes = len,
            objects = self.xref.total_entry_count(),
            encrypted = self.is_encrypted(),
            "saved document"
        );
        Ok(len)
    }

    /// Open a new xref section for an incremental update. Objects added
    /// afterwards are written by [`PdfDocument::save_update`].
    pub fn begin_update(&mut self) -> Result<()> {
        if self.saved_len.is_none() {
            return Err(PdfError::SectionNotWritten {
                start_offset: self.xref.current().start_offset(),
            });
        }
        self.xref.push_section();
        Ok(())
    }

    /// Append the current section to a file previously produced by
    /// [`PdfDocument::save`] (or an earlier update). `writer` must be
    /// positioned at the end of that file.
    pub fn save_update<W: Write>(&mut self, writer: W) -> Result<u64> {
        let base = self.saved_len.ok_or(PdfError::SectionNotWritten {
            start_offset: self.xref.current().start_offset(),
        })?;
        self.prepare_save()?;

        let mut out = PdfWriter::with_offset(writer, base);
        let cipher = DocumentCipher::new(self.security.as_ref(), self.encrypt_ref);
        self.xref
            .write_update(&mut out, cipher.as_ref().map(|c| c as &dyn ObjectCipher))?;
        out.flush()?;

        let len = out.position();
        self.saved_len = Some(len);
        debug!(bytes = len - base, "appended incremental update");
        Ok(len - base)
    }

    fn info_dict(&self) -> Option<&Dictionary> {
        self.info
            .and_then(|id| self.xref.object(id))
            .and_then(PdfObject::as_dict)
    }

    /// Derive keys, fill the /Encrypt dictionary and the trailer entries.
    fn prepare_save(&mut self) -> Result<()> {
        let root = self.root.ok_or_else(|| {
            PdfError::InvalidArgument("document has no catalog; call set_root first".into())
        })?;

        let file_id = match self.file_id {
            Some(file_id) => file_id,
            None => {
                let file_id = generate_file_id(self.info_dict());
                self.file_id = Some(file_id);
                file_id
            }
        };

        if let (Some(handler), Some(encrypt_ref)) = (self.security.as_mut(), self.encrypt_ref) {
            handler.set_file_id(file_id);
            handler.prepare()?;
            let dict = encrypt_dictionary(handler)?;
            let slot = self.xref.object_mut(encrypt_ref).ok_or_else(|| {
                PdfError::InvalidArgument(format!("encryption dictionary {encrypt_ref} is missing"))
            })?;
            *slot = PdfObject::Dict(dict);
        }

        let trailer = self.xref.current_mut().trailer_mut();
        trailer.set("Root", root);
        if let Some(info) = self.info {
            trailer.set("Info", info);
        }
        trailer.set("ID", file_id_array(&file_id));
        if let Some(encrypt_ref) = self.encrypt_ref {
            trailer.set("Encrypt", encrypt_ref);
        }
        Ok(())
    }

}

/// Encrypts every object except the /Encrypt dictionary itself.
struct DocumentCipher<'a> {
    handler: &'a StandardSecurityHandler,
    encrypt_dict: ObjectRef,
}

impl<'a> DocumentCipher<'a> {
    fn new(
        handler: Option<&'a StandardSecurityHandler>,
        encrypt_dict: Option<ObjectRef>,
    ) -> Option<Self> {
        Some(Self {
            handler: handler?,
            encrypt_dict: encrypt_dict?,
        })
    }
}

impl ObjectCipher for DocumentCipher<'_> {
    fn object_key(&self, id: ObjectRef) -> Result<Option<ObjectKey>> {
        if id == self.encrypt_dict {
            return Ok(None);
        }
        self.handler.object_key(id)
    }
}
