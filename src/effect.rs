use crate::contacts::ContactBook;
use crate::persist::SaveFile;

#[derive(Clone, Debug)]
pub enum Effect {
    SaveTeams { path: String, save: Box<SaveFile> },
    LoadTeams { path: String },
    ImportRoster { path: String },
    LoadContacts { path: String },
    SaveContacts { path: String, book: Box<ContactBook> },
}
