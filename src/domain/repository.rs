use super::model::library::Library;

/// 永続化の抽象。Infra層が実装する。
///
/// `load` はファイルが存在しなければ `Ok(None)` を返す。
/// 破損データの扱い（空Libraryへの復旧）はApplication層の責務。
pub trait LibraryRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(&self) -> Result<Option<Library>, Self::Error>;
    fn save(&self, library: &Library) -> Result<(), Self::Error>;
}
