use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;

use super::xml::{self, Element};
use crate::error::{Error, Result};

enum PartData {
    Raw(Vec<u8>),
    Xml(Element),
}

/// The ZIP container of one document. Entry order is kept so a saved package
/// lists its parts the way the input did; parts that were parsed for editing
/// are serialized again on save, everything else is copied byte for byte.
pub struct Package {
    order: Vec<String>,
    parts: HashMap<String, PartData>,
}

impl Package {
    pub fn open(path: &Path) -> Result<Package> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
                std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
            ),
            _ => Error::Io(e),
        })?;
        Package::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Package> {
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|_| Error::InvalidDocx("file is not a ZIP archive".into()))?;
        let mut order = Vec::with_capacity(zip.len());
        let mut parts = HashMap::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut entry = zip.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            order.push(name.clone());
            parts.insert(name, PartData::Raw(data));
        }
        Ok(Package { order, parts })
    }

    pub(crate) fn empty() -> Package {
        Package {
            order: Vec::new(),
            parts: HashMap::new(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Raw bytes of an entry that has not been parsed for editing.
    pub fn raw(&self, name: &str) -> Option<&[u8]> {
        match self.parts.get(name)? {
            PartData::Raw(data) => Some(data),
            PartData::Xml(_) => None,
        }
    }

    /// Parses an entry into an editable tree. Idempotent.
    pub fn load_xml(&mut self, name: &str) -> Result<()> {
        let Some(PartData::Raw(data)) = self.parts.get(name) else {
            return if self.parts.contains_key(name) {
                Ok(())
            } else {
                Err(Error::InvalidDocx(format!("missing part {name}")))
            };
        };
        let text = std::str::from_utf8(data)
            .map_err(|_| Error::InvalidDocx(format!("{name} is not UTF-8")))?;
        let root = xml::parse(text)?;
        self.parts.insert(name.to_string(), PartData::Xml(root));
        Ok(())
    }

    pub fn xml(&self, name: &str) -> Option<&Element> {
        match self.parts.get(name)? {
            PartData::Xml(root) => Some(root),
            PartData::Raw(_) => None,
        }
    }

    pub fn xml_mut(&mut self, name: &str) -> Option<&mut Element> {
        match self.parts.get_mut(name)? {
            PartData::Xml(root) => Some(root),
            PartData::Raw(_) => None,
        }
    }

    pub fn put_raw(&mut self, name: &str, data: Vec<u8>) {
        if !self.parts.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.parts.insert(name.to_string(), PartData::Raw(data));
    }

    pub fn put_xml(&mut self, name: &str, root: Element) {
        if !self.parts.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.parts.insert(name.to_string(), PartData::Xml(root));
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for name in &self.order {
            let Some(part) = self.parts.get(name) else {
                continue;
            };
            zip.start_file(name.as_str(), options)?;
            match part {
                PartData::Raw(data) => zip.write_all(data)?,
                PartData::Xml(root) => zip.write_all(xml::to_string(root).as_bytes())?,
            }
        }
        Ok(zip.finish()?.into_inner())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
